use approx::{AbsDiffEq, RelativeEq};
use std::cmp::PartialEq;

use crate::tensor::Tensor;

//↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓严格相等（形状、精度、数据均一致）↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<'a> PartialEq<&'a Tensor> for Tensor {
    fn eq(&self, other: &&'a Tensor) -> bool {
        self.data == other.data
    }
}
//↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑严格相等（形状、精度、数据均一致）↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

//↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓近似相等（供`approx`宏使用）↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
// 注：近似比较只要求形状一致，元素统一转为f64后逐个比较，所以f32与f64张量之间也可比较
impl AbsDiffEq for Tensor {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.is_same_shape(other)
            && self
                .to_vec()
                .iter()
                .zip(other.to_vec().iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Tensor {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.is_same_shape(other)
            && self
                .to_vec()
                .iter()
                .zip(other.to_vec().iter())
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
//↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑近似相等（供`approx`宏使用）↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑
