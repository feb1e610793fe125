use crate::assert_err;
use crate::errors::TensorError;
use crate::tensor::Tensor;
use std::fs::File;

#[test]
fn test_save_load_tensor() {
    let path = std::env::temp_dir().join("only_adagrad_test_save_load_tensor.bin");
    for orig_tensor in [
        Tensor::new(&[1., 2., 3., 4.], &[2, 2]),
        Tensor::new_f64(&[0.1, 0.2, 0.3], &[3, 1]),
    ] {
        let mut file = File::create(&path).unwrap();
        orig_tensor.save(&mut file).unwrap();

        let mut file = File::open(&path).unwrap();
        let loaded_tensor = Tensor::load(&mut file).unwrap();
        assert_eq!(loaded_tensor, orig_tensor);
        assert_eq!(loaded_tensor.dtype(), orig_tensor.dtype());
    }
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_load_corrupted_data() {
    let mut bytes: &[u8] = &[7, 7, 7];
    assert_err!(Tensor::load(&mut bytes), TensorError::Persistence(_));
}
