/*
 * @Author       : 老董
 * @Date         : 2026-10-12 13:45:16
 * @Description  : 带精度标记的张量。数据统一存放在`ndarray`的动态维数组中，
 *                 但元素类型可以是f32或f64，并在运行时通过`DType`区分，
 *                 以便在任何运算之前就能检查出精度不一致的问题
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 10:41:05
 */

use ndarray::{Array, ArrayD, IxDyn};
use rand::SeedableRng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TensorError;
use crate::utils::traits::float::FloatElement;

mod compare;
mod print;
mod property;
mod save_load;

#[cfg(test)]
mod tests;

/// 张量元素的浮点精度（位宽）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    F32,
    F64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "float32",
            DType::F64 => "float64",
        };
        write!(f, "{name}")
    }
}

/// 张量的底层数据，按精度区分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TensorData {
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为f32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: TensorData,
}

impl Tensor {
    /// 创建一个f32精度的张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::from_slice(data, shape)
    }

    /// 同`new`，但精度为f64
    pub fn new_f64(data: &[f64], shape: &[usize]) -> Tensor {
        Self::from_slice(data, shape)
    }

    /// 同`new`，但形状与数据长度不符时返回错误而非panic
    pub fn try_new<T: FloatElement>(data: &[T], shape: &[usize]) -> Result<Tensor, TensorError> {
        let expected_len = shape.iter().product::<usize>();
        let array = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
                expected_len,
            }
        })?;
        Ok(Self::from_array(array))
    }

    /// 创建一个所有元素都为`value`的张量
    pub fn full(shape: &[usize], value: f64, dtype: DType) -> Tensor {
        match dtype {
            DType::F32 => Self::from_array(ArrayD::from_elem(IxDyn(shape), value as f32)),
            DType::F64 => Self::from_array(ArrayD::from_elem(IxDyn(shape), value)),
        }
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize], dtype: DType) -> Tensor {
        Self::full(shape, 0.0, dtype)
    }

    /// 使用固定种子创建一个f32随机张量，其值在[min, max]的闭区间
    pub fn new_random_seeded(min: f32, max: f32, shape: &[usize], seed: u64) -> Tensor {
        let mut rng = StdRng::seed_from_u64(seed);
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(&mut rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 由`ndarray`数组直接构造张量
    pub fn from_array<T: FloatElement>(array: ArrayD<T>) -> Tensor {
        Tensor {
            data: T::wrap(array),
        }
    }

    /// 转换为指定精度的新张量（f64 -> f32 会损失精度）
    pub fn cast(&self, dtype: DType) -> Tensor {
        match (&self.data, dtype) {
            (TensorData::F32(a), DType::F64) => Self::from_array(a.mapv(f64::from)),
            (TensorData::F64(a), DType::F32) => Self::from_array(a.mapv(|x| x as f32)),
            _ => self.clone(),
        }
    }
}

// 私有方法
impl Tensor {
    fn from_slice<T: FloatElement>(data: &[T], shape: &[usize]) -> Tensor {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{e}"),
        }
    }
}
