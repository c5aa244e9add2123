//! Trains a small classifier on two noisy clusters and writes the graph of
//! the final loss to `loss_graph.dot`.
//!
//! Run with `RUST_LOG=debug` to see graph and optimizer logs.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tensorflood_core::{tensor, viz, Graph, Node};
use tensorflood_nn::{
    accuracy, bce_loss, GradientDescent, Module, NeuralNetwork, Optimizer, Reduction,
};

const EPOCHS: usize = 100;
const PER_CLASS: usize = 50;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(0);
    let noise = Normal::new(0.0, 0.4)?;
    let mut inputs = Vec::new();
    let mut labels = Vec::new();
    for (center, label) in [(1.0, 1.0), (-1.0, 0.0)] {
        for _ in 0..PER_CLASS {
            inputs.push(center + noise.sample(&mut rng));
            inputs.push(center + noise.sample(&mut rng));
            labels.push(label);
        }
    }
    let inputs = tensor::from_vec(inputs, &[2 * PER_CLASS, 2])?;
    let labels = tensor::from_vec(labels, &[2 * PER_CLASS, 1])?;

    let graph = Graph::new();
    let _scope = graph.enter();
    let net = NeuralNetwork::new(2, &[8, 4, 1], &mut rng)?;
    let mut optim = GradientDescent::new(net.parameters(), 0.3)?;

    let mut last_loss = None;
    for epoch in 0..EPOCHS {
        graph.reset();
        let x = Node::constant(inputs.clone(), Some("X"))?;
        let y = Node::constant(labels.clone(), Some("y"))?;
        let loss = bce_loss(&net.forward(&x)?, &y, Reduction::Mean)?;

        optim.zero_grad();
        loss.backward()?;
        optim.step()?;

        if epoch % 10 == 0 {
            let value = tensor::to_scalar(&loss.value()).unwrap_or(f64::NAN);
            println!("epoch {:>3}  loss {:.4}", epoch, value);
        }
        last_loss = Some(loss);
    }

    let predictions = net.predict(&inputs)?;
    println!("accuracy {:.2}", accuracy(&predictions, &labels)?);

    if let Some(loss) = last_loss {
        std::fs::write("loss_graph.dot", viz::to_dot(&loss))?;
        println!("wrote loss_graph.dot");
    }
    Ok(())
}
