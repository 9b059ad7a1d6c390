use sift_nn::{
    sigmoid, BatchNorm, BinaryClassifier, ClassifierSpec, Matrix, ModelError, ProbabilityModel,
    Stage,
};

fn spec(input_size: usize, hidden_size: usize, num_hidden_layers: usize) -> ClassifierSpec {
    ClassifierSpec::new("test", input_size, hidden_size, num_hidden_layers)
}

#[test]
fn test_stage_sequence_matches_depth() {
    for n in [0, 1, 3] {
        let model = BinaryClassifier::new(spec(4, 8, n)).unwrap();

        // batch-norm, input linear, then one ReLU + linear per hidden layer,
        // then the ReLU + output linear pair.
        let mut expected = vec![
            Stage::BatchNorm { features: 4 },
            Stage::Linear { inputs: 4, outputs: 8 },
        ];
        for _ in 0..n {
            expected.push(Stage::ReLU);
            expected.push(Stage::Linear { inputs: 8, outputs: 8 });
        }
        expected.push(Stage::ReLU);
        expected.push(Stage::Linear { inputs: 8, outputs: 1 });

        let stages = model.stages();
        assert_eq!(stages.len(), 2 * n + 4, "stage count for {} hidden layers", n);
        assert_eq!(stages, expected, "stage order for {} hidden layers", n);
    }
}

#[test]
fn test_forward_batch_shape() {
    let mut model = BinaryClassifier::new(spec(3, 5, 1)).unwrap();
    let x = Matrix::from_data(vec![vec![0.1, 0.2, 0.3]; 4]);
    let logits = model.forward_batch(&x, false);
    assert_eq!(logits.rows, 4);
    assert_eq!(logits.cols, 1);
}

#[test]
fn test_predictions_stay_in_unit_interval() {
    let mut model = BinaryClassifier::new(spec(2, 8, 2)).unwrap();
    // Large-magnitude inputs push the logits far from zero; the predicted
    // probabilities must still land in [0, 1].
    let inputs: Vec<Vec<f64>> = (0..40)
        .map(|i| {
            let v = (i as f64 - 20.0) * 50.0;
            vec![v, -v]
        })
        .collect();
    let probs = model.predict(&inputs);
    assert_eq!(probs.len(), 40);
    for p in probs {
        assert!((0.0..=1.0).contains(&p), "probability out of range: {}", p);
    }
}

#[test]
fn test_wrapper_equals_sigmoid_of_raw_output() {
    let mut model = BinaryClassifier::new(spec(3, 6, 1)).unwrap();
    let input = vec![0.3, -1.2, 2.5];

    let raw = model.forward(&input);
    let mut wrapped = ProbabilityModel::new(model.clone());
    let prob = wrapped.forward(&input);

    assert_eq!(prob.len(), raw.len());
    for (p, z) in prob.iter().zip(raw.iter()) {
        assert!((p - sigmoid(*z)).abs() < 1e-12);
    }
}

#[test]
#[should_panic(expected = "feature count")]
fn test_input_feature_mismatch_panics() {
    let mut model = BinaryClassifier::new(spec(3, 4, 0)).unwrap();
    model.forward(&[1.0, 2.0]);
}

#[test]
#[should_panic(expected = "more than one sample")]
fn test_single_sample_training_batch_panics() {
    let mut model = BinaryClassifier::new(spec(2, 4, 0)).unwrap();
    model.forward_batch(&Matrix::from_data(vec![vec![0.0, 1.0]]), true);
}

#[test]
fn test_batch_norm_standardizes_training_batch() {
    let mut bn = BatchNorm::new(2);
    let x = Matrix::from_data(vec![
        vec![1.0, 10.0],
        vec![2.0, 20.0],
        vec![3.0, 30.0],
        vec![4.0, 40.0],
    ]);
    let out = bn.forward(&x, true);

    for j in 0..2 {
        let mean: f64 = (0..4).map(|i| out.data[i][j]).sum::<f64>() / 4.0;
        let var: f64 = (0..4).map(|i| (out.data[i][j] - mean).powi(2)).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-9, "column {} mean {}", j, mean);
        assert!((var - 1.0).abs() < 1e-2, "column {} variance {}", j, var);
    }

    // Running estimates moved toward the batch statistics.
    assert!(bn.running_mean[0] > 0.0);
    assert!(bn.running_var[1] > 1.0);
}

#[test]
fn test_spec_validation_rejects_zero_dims() {
    let bad = ClassifierSpec::new("bad", 0, 4, 0);
    match BinaryClassifier::new(bad) {
        Err(ModelError::InvalidSpec { message }) => assert!(message.contains("input_size")),
        other => panic!("expected InvalidSpec, got {:?}", other),
    }
}

#[test]
fn test_model_json_roundtrip_preserves_predictions() {
    let mut model = BinaryClassifier::new(spec(3, 6, 2)).unwrap();
    let input = vec![0.5, -0.25, 1.75];
    let before = model.forward(&input);

    let path = std::env::temp_dir().join("sift_nn_roundtrip_model.json");
    let path = path.to_str().unwrap().to_string();
    model.save_json(&path).unwrap();
    let mut restored = BinaryClassifier::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored.spec.hidden_size, 6);
    assert_eq!(before, restored.forward(&input));
}
