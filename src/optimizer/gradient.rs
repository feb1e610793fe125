/*
 * @Author       : 老董
 * @Date         : 2026-10-13 14:03:52
 * @Description  : 梯度的两种表示：稠密梯度与稀疏（按行索引）梯度。
 *                 二者作为同一枚举的不同变体，由更新器显式分派
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 20:18:09
 */

use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis, IxDyn, Zip};

use crate::errors::OptimizerError;
use crate::tensor::{DType, Tensor};
use crate::utils::traits::float::FloatElement;

/// 稀疏梯度：只给出部分行（第0维）的梯度值，未列出的行视为零梯度。
///
/// - `values`的形状为`[indices.len(), dense_shape[1..]...]`
/// - `indices`中的每个值都须小于`dense_shape[0]`，允许重复（重复行的梯度会先求和）
/// - `dense_shape`为对应稠密梯度（即参数）的形状
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedSlices {
    values: Tensor,
    indices: Vec<usize>,
    dense_shape: Vec<usize>,
}

impl IndexedSlices {
    pub fn new(
        values: Tensor,
        indices: &[usize],
        dense_shape: &[usize],
    ) -> Result<Self, OptimizerError> {
        if dense_shape.is_empty() {
            return Err(OptimizerError::ShapeMismatch {
                name: "dense_shape".to_string(),
                expected: vec![1],
                got: vec![],
            });
        }
        let mut expected_values_shape = vec![indices.len()];
        expected_values_shape.extend_from_slice(&dense_shape[1..]);
        if values.shape() != expected_values_shape.as_slice() {
            return Err(OptimizerError::ShapeMismatch {
                name: "values".to_string(),
                expected: expected_values_shape,
                got: values.shape().to_vec(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= dense_shape[0]) {
            return Err(OptimizerError::IndexOutOfBounds {
                name: "indices".to_string(),
                index,
                bound: dense_shape[0],
            });
        }
        Ok(Self {
            values,
            indices: indices.to_vec(),
            dense_shape: dense_shape.to_vec(),
        })
    }

    pub fn values(&self) -> &Tensor {
        &self.values
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn dense_shape(&self) -> &[usize] {
        &self.dense_shape
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    pub fn has_duplicate_indices(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.indices.len());
        !self.indices.iter().all(|i| seen.insert(*i))
    }

    /// 将重复行的梯度求和，返回按行索引升序排列的（行索引，该行梯度）列表
    pub(crate) fn merged_rows<T: FloatElement>(&self) -> Option<BTreeMap<usize, ArrayD<T>>> {
        let values = self.values.as_array::<T>()?;
        let mut merged: BTreeMap<usize, ArrayD<T>> = BTreeMap::new();
        for (position, &row) in self.indices.iter().enumerate() {
            let row_values = values.index_axis(Axis(0), position);
            match merged.get_mut(&row) {
                Some(sum) => Zip::from(sum).and(&row_values).for_each(|s, &v| *s = *s + v),
                None => {
                    merged.insert(row, row_values.to_owned());
                }
            }
        }
        Some(merged)
    }

    /// 转为等价的稠密梯度（重复行求和，未列出的行为零）
    pub fn to_dense(&self) -> Tensor {
        match self.dtype() {
            DType::F32 => self.to_dense_typed::<f32>(),
            DType::F64 => self.to_dense_typed::<f64>(),
        }
    }

    fn to_dense_typed<T: FloatElement>(&self) -> Tensor {
        let mut dense = ArrayD::<T>::zeros(IxDyn(&self.dense_shape));
        for (row, row_values) in self.merged_rows::<T>().unwrap_or_default() {
            dense.index_axis_mut(Axis(0), row).assign(&row_values);
        }
        Tensor::from_array(dense)
    }
}

/// 施加到某个参数上的梯度，可选地带有名字（用于错误信息）
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Dense {
        values: Tensor,
        name: Option<String>,
    },
    Sparse {
        slices: IndexedSlices,
        name: Option<String>,
    },
}

impl Gradient {
    pub fn dense(values: Tensor) -> Self {
        Gradient::Dense { values, name: None }
    }

    pub fn sparse(slices: IndexedSlices) -> Self {
        Gradient::Sparse { slices, name: None }
    }

    pub fn with_name(self, name: &str) -> Self {
        let name = Some(name.to_string());
        match self {
            Gradient::Dense { values, .. } => Gradient::Dense { values, name },
            Gradient::Sparse { slices, .. } => Gradient::Sparse { slices, name },
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Gradient::Dense { name, .. } | Gradient::Sparse { name, .. } => name.as_deref(),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Gradient::Dense { values, .. } => values.dtype(),
            Gradient::Sparse { slices, .. } => slices.dtype(),
        }
    }

    /// 对应稠密梯度的形状
    pub fn shape(&self) -> &[usize] {
        match self {
            Gradient::Dense { values, .. } => values.shape(),
            Gradient::Sparse { slices, .. } => slices.dense_shape(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Gradient::Sparse { .. })
    }
}

impl From<Tensor> for Gradient {
    fn from(values: Tensor) -> Self {
        Gradient::dense(values)
    }
}

impl From<IndexedSlices> for Gradient {
    fn from(slices: IndexedSlices) -> Self {
        Gradient::sparse(slices)
    }
}
