use crate::{math::matrix::Matrix, layers::dense::Dense};

pub struct Sgd {
    /// Current step size; the training loop rewrites this each epoch when a
    /// schedule is attached.
    pub learning_rate: f64,
    /// L2 coefficient λ; zero disables decay.
    pub weight_decay: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64, weight_decay: f64) -> Sgd {
        Sgd { learning_rate, weight_decay }
    }

    /// Applies one SGD update to a layer given its pre-computed gradients.
    /// Weight decay adds λ·θ to the gradient before the step, for both
    /// weights and biases.
    pub fn step(&self, layer: &mut Dense, weights_grad: Matrix, biases_grad: Matrix) {
        let (weights_grad, biases_grad) = if self.weight_decay != 0.0 {
            let wd = self.weight_decay;
            (
                weights_grad + layer.weights.map(|x| x * wd),
                biases_grad + layer.biases.map(|x| x * wd),
            )
        } else {
            (weights_grad, biases_grad)
        };
        layer.apply_gradients(weights_grad, biases_grad, self.learning_rate);
    }
}
