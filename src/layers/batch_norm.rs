use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Input normalization layer with running statistics and no learned affine
/// parameters.
///
/// Training mode standardizes each feature by the statistics of the current
/// batch and folds those statistics into the running estimates; eval mode
/// standardizes by the running estimates alone. The layer is parameter-free,
/// so no gradient flows through it.
///
/// The running estimates are part of the model state and serialize with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchNorm {
    pub num_features: usize,
    pub eps: f64,
    pub momentum: f64,
    pub running_mean: Vec<f64>,
    pub running_var: Vec<f64>,
    /// Normalized output of the last forward pass; read by the first dense
    /// layer's backward step.
    #[serde(skip)]
    pub output: Matrix,
}

impl BatchNorm {
    pub fn new(num_features: usize) -> BatchNorm {
        BatchNorm {
            num_features,
            eps: 1e-5,
            momentum: 0.1,
            running_mean: vec![0.0; num_features],
            running_var: vec![1.0; num_features],
            output: Matrix::default(),
        }
    }

    /// Standardizes a batch (one sample per row).
    ///
    /// In training mode the batch must hold more than one sample; batch
    /// statistics are undefined for a single row. The running estimates are
    /// updated with momentum, using the unbiased variance.
    pub fn forward(&mut self, input: &Matrix, training: bool) -> Matrix {
        assert_eq!(
            input.cols, self.num_features,
            "input feature count does not match the normalization layer"
        );

        let (mean, var) = if training {
            assert!(
                input.rows > 1,
                "batch normalization requires more than one sample per training batch"
            );
            let mean = input.column_mean();
            let var = input.column_variance(&mean);

            let n = input.rows as f64;
            let m = self.momentum;
            for j in 0..self.num_features {
                self.running_mean[j] = (1.0 - m) * self.running_mean[j] + m * mean[j];
                let unbiased = var[j] * n / (n - 1.0);
                self.running_var[j] = (1.0 - m) * self.running_var[j] + m * unbiased;
            }
            (mean, var)
        } else {
            (self.running_mean.clone(), self.running_var.clone())
        };

        let mut res = input.clone();
        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = (res.data[i][j] - mean[j]) / (var[j] + self.eps).sqrt();
            }
        }
        self.output = res.clone();
        res
    }
}
