use ndarray::ArrayD;
use num_traits::Float;
use std::fmt::{Debug, Display};

use crate::tensor::{DType, TensorData};

/// 张量可承载的浮点元素类型（目前为f32和f64）。
/// 优化器的计算核以此为泛型参数，从而对两种精度只写一份实现
pub trait FloatElement: Float + Debug + Display + Send + Sync + 'static {
    /// 本类型对应的精度标记
    const DTYPE: DType;

    /// 由f64转换而来（对f32会损失精度）
    fn from_f64(value: f64) -> Self;

    fn wrap(array: ArrayD<Self>) -> TensorData;

    fn unwrap_ref(data: &TensorData) -> Option<&ArrayD<Self>>;

    fn unwrap_mut(data: &mut TensorData) -> Option<&mut ArrayD<Self>>;
}

impl FloatElement for f32 {
    const DTYPE: DType = DType::F32;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn wrap(array: ArrayD<Self>) -> TensorData {
        TensorData::F32(array)
    }

    fn unwrap_ref(data: &TensorData) -> Option<&ArrayD<Self>> {
        match data {
            TensorData::F32(a) => Some(a),
            TensorData::F64(_) => None,
        }
    }

    fn unwrap_mut(data: &mut TensorData) -> Option<&mut ArrayD<Self>> {
        match data {
            TensorData::F32(a) => Some(a),
            TensorData::F64(_) => None,
        }
    }
}

impl FloatElement for f64 {
    const DTYPE: DType = DType::F64;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn wrap(array: ArrayD<Self>) -> TensorData {
        TensorData::F64(array)
    }

    fn unwrap_ref(data: &TensorData) -> Option<&ArrayD<Self>> {
        match data {
            TensorData::F64(a) => Some(a),
            TensorData::F32(_) => None,
        }
    }

    fn unwrap_mut(data: &mut TensorData) -> Option<&mut ArrayD<Self>> {
        match data {
            TensorData::F64(a) => Some(a),
            TensorData::F32(_) => None,
        }
    }
}
