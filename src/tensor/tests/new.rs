use crate::assert_panic;
use crate::errors::TensorError;
use crate::tensor::{DType, Tensor};

#[test]
fn test_new_f32_and_f64() {
    let tensor = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    assert_eq!(tensor.dtype(), DType::F32);
    assert_eq!(tensor.shape(), &[2, 2]);

    let tensor = Tensor::new_f64(&[1., 2., 3., 4.], &[4]);
    assert_eq!(tensor.dtype(), DType::F64);
    assert_eq!(tensor.shape(), &[4]);
}

#[test]
fn test_new_with_wrong_data_len() {
    assert_panic!(
        Tensor::new(&[1., 2., 3.], &[2, 2]),
        "数据长度为3，与形状[2, 2]所需的元素个数4不一致"
    );

    let result = Tensor::try_new(&[1.0f64, 2.0], &[3]);
    assert_eq!(
        result.unwrap_err(),
        TensorError::DataShapeMismatch {
            data_len: 2,
            shape: vec![3],
            expected_len: 3,
        }
    );
}

#[test]
fn test_full_and_zeros() {
    let tensor = Tensor::full(&[2, 3], 0.1, DType::F32);
    assert_eq!(tensor, Tensor::new(&[0.1; 6], &[2, 3]));

    let tensor = Tensor::full(&[1, 6], 0.1, DType::F64);
    assert_eq!(tensor, Tensor::new_f64(&[0.1; 6], &[1, 6]));

    let tensor = Tensor::zeros(&[3], DType::F64);
    assert_eq!(tensor.to_vec(), vec![0.0; 3]);
}

#[test]
fn test_new_random_seeded() {
    let tensor1 = Tensor::new_random_seeded(-1.0, 1.0, &[4, 5], 42);
    let tensor2 = Tensor::new_random_seeded(-1.0, 1.0, &[4, 5], 42);
    assert_eq!(tensor1, tensor2);
    assert!(tensor1.to_vec().iter().all(|x| (-1.0..=1.0).contains(x)));

    let tensor3 = Tensor::new_random_seeded(-1.0, 1.0, &[4, 5], 43);
    assert_ne!(tensor1, tensor3);
}

#[test]
fn test_cast() {
    let tensor = Tensor::new(&[1.5, -2.0], &[2]);
    let casted = tensor.cast(DType::F64);
    assert_eq!(casted, Tensor::new_f64(&[1.5, -2.0], &[2]));
    assert_eq!(casted.cast(DType::F32), tensor);
    // 同精度转换不改变张量
    assert_eq!(tensor.cast(DType::F32), tensor);
}
