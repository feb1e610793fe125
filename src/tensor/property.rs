/*
 * @Author       : 老董
 * @Date         : 2026-10-12 11:08:33
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 09:12:37
 */

use super::{DType, Tensor, TensorData};
use crate::utils::traits::float::FloatElement;
use ndarray::ArrayD;

impl Tensor {
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        match &self.data {
            TensorData::F32(a) => a.shape(),
            TensorData::F64(a) => a.shape(),
        }
    }

    /// 元素的浮点精度
    pub fn dtype(&self) -> DType {
        match &self.data {
            TensorData::F32(_) => DType::F32,
            TensorData::F64(_) => DType::F64,
        }
    }

    /// 张量的维（dim）数、阶（rank）数
    /// 即`shape()`的元素个数--如：形状为`[]`的标量阶数为0，向量阶数为1，矩阵阶数为2，以此类推
    pub fn dimension(&self) -> usize {
        self.shape().len()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.shape().iter().product()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f64> {
        if self.is_scalar() {
            self.to_vec().first().copied()
        } else {
            None
        }
    }

    /// 取出单个元素（统一以f64返回）；索引越界或维数不符时返回None
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        match &self.data {
            TensorData::F32(a) => a.get(index).map(|&x| f64::from(x)),
            TensorData::F64(a) => a.get(index).copied(),
        }
    }

    /// 按行优先顺序展开为f64向量
    pub fn to_vec(&self) -> Vec<f64> {
        match &self.data {
            TensorData::F32(a) => a.iter().map(|&x| f64::from(x)).collect(),
            TensorData::F64(a) => a.iter().copied().collect(),
        }
    }

    /// 底层数据
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// 以指定精度借出底层数组，精度不符时返回None
    pub fn as_array<T: FloatElement>(&self) -> Option<&ArrayD<T>> {
        T::unwrap_ref(&self.data)
    }

    pub(crate) fn as_array_mut<T: FloatElement>(&mut self) -> Option<&mut ArrayD<T>> {
        T::unwrap_mut(&mut self.data)
    }
}
