/*
 * @Author       : 老董
 * @Date         : 2026-10-15 17:22:58
 * @Description  : Adagrad 优化器的端到端测试：稠密/稀疏更新、张量学习率、精度校验与累加器共享
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 14:03:52
 */

use approx::assert_abs_diff_eq;
use only_adagrad::errors::OptimizerError;
use only_adagrad::optimizer::{
    ACCUMULATOR_SLOT, Adagrad, AdagradUpdater, Gradient, IndexedSlices, LearningRate,
};
use only_adagrad::tensor::{DType, Tensor};
use only_adagrad::variable::Variable;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 以`optimizer`对两组变量做3步更新，并验证结果
fn run_basic(mut optimizer: Adagrad) -> Result<(), OptimizerError> {
    let mut var0 = Variable::new(Tensor::new(&[1.0, 2.0], &[2]), Some("var0"));
    let mut var1 = Variable::new(Tensor::new(&[3.0, 4.0], &[2]), Some("var1"));
    let grads0 = Gradient::dense(Tensor::new(&[0.1, 0.1], &[2]));
    let grads1 = Gradient::dense(Tensor::new(&[0.01, 0.01], &[2]));

    assert_eq!(var0.value(), &Tensor::new(&[1.0, 2.0], &[2]));
    assert_eq!(var1.value(), &Tensor::new(&[3.0, 4.0], &[2]));
    for _ in 0..3 {
        optimizer.apply_gradients([(&grads0, &mut var0), (&grads1, &mut var1)])?;
    }
    assert_abs_diff_eq!(
        var0.value(),
        &Tensor::new(&[-1.602_609_9, -0.602_609_9], &[2]),
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        var1.value(),
        &Tensor::new(&[2.715_679_2, 3.715_679_2], &[2]),
        epsilon = 1e-5
    );
    Ok(())
}

#[test]
fn test_basic() -> Result<(), OptimizerError> {
    init_logger();
    run_basic(Adagrad::new(3.0, 0.1)?)
}

#[test]
fn test_tensor_learning_rate() -> Result<(), OptimizerError> {
    init_logger();
    let learning_rate = LearningRate::from_tensor(&Tensor::new(&[3.0], &[]))?;
    run_basic(Adagrad::new(learning_rate, 0.1)?)
}

#[test]
fn test_float64() -> Result<(), OptimizerError> {
    init_logger();
    let mut optimizer = Adagrad::new(3.0, 0.1)?;
    let mut good_vars = [
        Variable::new(Tensor::new(&[1.0], &[1]), None),
        Variable::new(Tensor::new(&[3.0], &[1]), None),
    ];
    let mut bad_vars = [
        Variable::new(Tensor::new_f64(&[1.0], &[1]), Some("bad_var")),
        Variable::new(Tensor::new_f64(&[3.0], &[1]), Some("bad_var")),
    ];

    let bad_grads = [
        Gradient::dense(Tensor::new_f64(&[0.1], &[1])).with_name("bad_grad"),
        Gradient::dense(Tensor::new(&[0.01], &[1])),
    ];
    let [good0, good1] = &mut good_vars;
    let error = optimizer
        .apply_gradients([(&bad_grads[0], good0), (&bad_grads[1], good1)])
        .unwrap_err();
    assert_eq!(
        error,
        OptimizerError::PrecisionMismatch {
            name: "bad_grad".to_string(),
            expected: DType::F32,
            got: DType::F64,
        }
    );
    assert!(error.to_string().contains("float64"));

    let good_grads = [
        Gradient::dense(Tensor::new(&[0.01], &[1])),
        Gradient::dense(Tensor::new(&[0.02], &[1])),
    ];
    let [bad0, bad1] = &mut bad_vars;
    let error = optimizer
        .apply_gradients([(&good_grads[0], bad0), (&good_grads[1], bad1)])
        .unwrap_err();
    assert!(matches!(
        &error,
        OptimizerError::PrecisionMismatch { name, expected: DType::F64, got: DType::F32 }
            if name.contains("bad_var")
    ));

    // 出错的调用没有改动任何变量
    assert_eq!(good_vars[0].value(), &Tensor::new(&[1.0], &[1]));
    assert_eq!(bad_vars[0].value(), &Tensor::new_f64(&[1.0], &[1]));

    let [good0, good1] = &mut good_vars;
    optimizer.apply_gradients([(&good_grads[0], good0), (&good_grads[1], good1)])?;
    assert_eq!(optimizer.step(), 1);
    Ok(())
}

#[test]
fn test_sparse_basic() -> Result<(), OptimizerError> {
    init_logger();
    let mut var0 = Variable::new(Tensor::new(&[1.0, 2.0], &[2, 1]), Some("var0"));
    let mut var1 = Variable::new(Tensor::new(&[3.0, 4.0], &[2, 1]), Some("var1"));
    let grads0 = Gradient::from(IndexedSlices::new(Tensor::new(&[0.1], &[1, 1]), &[0], &[2, 1])?);
    let grads1 = Gradient::from(IndexedSlices::new(Tensor::new(&[0.01], &[1, 1]), &[1], &[2, 1])?);
    let mut optimizer = Adagrad::new(3.0, 0.1)?;
    for _ in 0..3 {
        optimizer.apply_gradients([(&grads0, &mut var0), (&grads1, &mut var1)])?;
    }
    assert_abs_diff_eq!(
        var0.value(),
        &Tensor::new(&[-1.602_609_9, 2.0], &[2, 1]),
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        var1.value(),
        &Tensor::new(&[3.0, 3.715_679_2], &[2, 1]),
        epsilon = 1e-5
    );
    Ok(())
}

#[test]
fn test_sparse_stability() -> Result<(), OptimizerError> {
    init_logger();
    let shape = [1, 6];
    let initial = Tensor::new(
        &[0.00872496, -0.106952, 0.110467, 0.226505, -0.0147257, -0.0105945],
        &shape,
    );
    let grads0 = Gradient::sparse(IndexedSlices::new(
        Tensor::new(
            &[-5.91278e-05, 5.31673e-05, -2.5779e-06, 4.29153e-05, -8.4877e-05, -9.48906e-05],
            &shape,
        ),
        &[0],
        &shape,
    )?);
    let expected = Tensor::new(
        &[0.00891194, -0.10712013, 0.11047515, 0.22636929, -0.0144573, -0.01029443],
        &shape,
    );

    let mut var0 = Variable::new(initial.clone(), Some("var0"));
    let mut optimizer = Adagrad::new(1.0, 0.1)?;
    assert_eq!(optimizer.slot_names(), &["accumulator"]);
    for _ in 0..100 {
        // 每轮都从相同的初始状态出发
        optimizer.reset();
        *var0.value_mut() = initial.clone();
        optimizer.apply_gradients([(&grads0, &mut var0)])?;

        let slot0 = optimizer
            .get_slot(&var0, ACCUMULATOR_SLOT)
            .ok_or_else(|| OptimizerError::SlotNotFound(ACCUMULATOR_SLOT.to_string()))?;
        assert_abs_diff_eq!(slot0, &Tensor::full(&shape, 0.1, DType::F32), epsilon = 1e-5);
        assert_abs_diff_eq!(var0.value(), &expected, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn test_sharing() -> Result<(), OptimizerError> {
    init_logger();
    let mut var0 = Variable::new(Tensor::new(&[1.0, 2.0], &[2]), Some("var0"));
    let mut var1 = Variable::new(Tensor::new(&[3.0, 4.0], &[2]), Some("var1"));
    let grads0 = Gradient::dense(Tensor::new(&[0.1, 0.1], &[2]));
    let grads1 = Gradient::dense(Tensor::new(&[0.01, 0.01], &[2]));
    let mut optimizer = Adagrad::new_default(3.0)?;

    // 两个更新“入口”：一个一次更新两者，另一个分两次调用，但共享同一批累加器
    optimizer.apply_gradients([(&grads0, &mut var0), (&grads1, &mut var1)])?;
    let slot0 = optimizer.get_slot(&var0, ACCUMULATOR_SLOT).map(|s| s.shape().to_vec());
    assert_eq!(slot0.as_deref(), Some(var0.shape()));
    let slot1 = optimizer.get_slot(&var1, ACCUMULATOR_SLOT).map(|s| s.shape().to_vec());
    assert_eq!(slot1.as_deref(), Some(var1.shape()));

    optimizer.apply_gradients([(&grads1, &mut var1)])?;
    optimizer.apply_gradients([(&grads0, &mut var0)])?;
    optimizer.apply_gradients([(&grads0, &mut var0), (&grads1, &mut var1)])?;

    assert_abs_diff_eq!(
        var0.value(),
        &Tensor::new(&[-1.602_609_9, -0.602_609_9], &[2]),
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        var1.value(),
        &Tensor::new(&[2.715_679_2, 3.715_679_2], &[2]),
        epsilon = 1e-5
    );
    Ok(())
}

#[test]
fn test_updater_matches_optimizer() -> Result<(), OptimizerError> {
    init_logger();
    let mut parameter = Tensor::new(&[1.0, 2.0], &[2]);
    let mut accumulator = AdagradUpdater::initialize(&[2], 0.1, DType::F32)?;
    let gradient = Gradient::dense(Tensor::new(&[0.1, 0.1], &[2]));
    for _ in 0..3 {
        AdagradUpdater::apply_in_place(&mut parameter, &mut accumulator, &gradient, 3.0)?;
    }
    assert_abs_diff_eq!(
        parameter,
        Tensor::new(&[-1.602_609_9, -0.602_609_9], &[2]),
        epsilon = 1e-5
    );
    Ok(())
}
