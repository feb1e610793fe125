use thiserror::Error;
mod ops;
pub use self::ops::*;

use crate::tensor::DType;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度为{data_len}，与形状{shape:?}所需的元素个数{expected_len}不一致")]
    DataShapeMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected_len: usize,
    },
    #[error("张量保存/加载失败：{0}")]
    Persistence(String),
}

/// 优化器相关的错误。所有错误都在修改任何状态（参数或累加器）之前报告
#[derive(Error, Debug, PartialEq)]
pub enum OptimizerError {
    #[error("张量`{name}`的形状不一致：期望{expected:?}，实际为{got:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("张量`{name}`的精度无效：实际为{got}，期望{expected}")]
    PrecisionMismatch {
        name: String,
        expected: DType,
        got: DType,
    },
    #[error("配置项`{name}`须{operator}{threshold}，实际为{value}")]
    InvalidConfiguration {
        name: String,
        value: f64,
        operator: ComparisonOperator,
        threshold: f64,
    },
    #[error("稀疏梯度`{name}`的行索引{index}越界（须<{bound}）")]
    IndexOutOfBounds {
        name: String,
        index: usize,
        bound: usize,
    },
    #[error("不存在名为`{0}`的槽位")]
    SlotNotFound(String),
}

/// 读取配置文件时的错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法读取配置文件：{0}")]
    Io(#[from] std::io::Error),
    #[error("配置文件格式错误：{0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] OptimizerError),
}
