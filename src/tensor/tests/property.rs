use crate::tensor::{DType, Tensor};

#[test]
fn test_dimension_and_size() {
    let tensor = Tensor::new(&[1.], &[]);
    assert_eq!(tensor.dimension(), 0);
    assert_eq!(tensor.size(), 1);

    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(tensor.dimension(), 2);
    assert_eq!(tensor.size(), 6);
}

#[test]
fn test_is_same_shape() {
    let tensor1 = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    let tensor2 = Tensor::new_f64(&[1., 2., 3., 4.], &[1, 4]);
    let tensor3 = Tensor::new(&[1., 2., 3., 4.], &[4]);
    assert!(tensor1.is_same_shape(&tensor2));
    assert!(!tensor1.is_same_shape(&tensor3));
}

#[test]
fn test_scalar_number() {
    let shapes: &[&[usize]] = &[&[], &[1], &[1, 1], &[1, 1, 1]];
    for shape in shapes {
        let tensor = Tensor::new(&[3.], shape);
        assert!(tensor.is_scalar());
        assert_eq!(tensor.number(), Some(3.0));
    }
    let tensor = Tensor::new(&[1., 2.], &[2]);
    assert!(!tensor.is_scalar());
    assert_eq!(tensor.number(), None);
}

#[test]
fn test_get_and_to_vec() {
    let tensor = Tensor::new_f64(&[1., 2., 3., 4.], &[2, 2]);
    assert_eq!(tensor.get(&[1, 0]), Some(3.0));
    assert_eq!(tensor.get(&[2, 0]), None);
    assert_eq!(tensor.to_vec(), vec![1., 2., 3., 4.]);
}

#[test]
fn test_as_array_checks_dtype() {
    let tensor = Tensor::new(&[1., 2.], &[2]);
    assert_eq!(tensor.dtype(), DType::F32);
    assert!(tensor.as_array::<f32>().is_some());
    assert!(tensor.as_array::<f64>().is_none());
}
