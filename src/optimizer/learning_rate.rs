/*
 * @Author       : 老董
 * @Date         : 2026-10-13 20:18:09
 * @Description  : 学习率：既可以是固定值（纯数或标量张量），也可以按步数动态计算
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 13:45:16
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ComparisonOperator, OptimizerError};
use crate::tensor::Tensor;

/// 按训练步数（从0开始）给出学习率的策略
pub trait LearningRateSchedule: Send + Sync {
    fn rate(&self, step: usize) -> f64;
}

impl<F> LearningRateSchedule for F
where
    F: Fn(usize) -> f64 + Send + Sync,
{
    fn rate(&self, step: usize) -> f64 {
        self(step)
    }
}

/// 指数衰减：`rate = initial_rate * decay_rate^(step / decay_steps)`，
/// `staircase`为真时指数取整，学习率呈阶梯状下降
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialDecay {
    pub initial_rate: f64,
    pub decay_rate: f64,
    pub decay_steps: usize,
    pub staircase: bool,
}

impl LearningRateSchedule for ExponentialDecay {
    fn rate(&self, step: usize) -> f64 {
        if self.decay_steps == 0 {
            return self.initial_rate;
        }
        let mut exponent = step as f64 / self.decay_steps as f64;
        if self.staircase {
            exponent = exponent.floor();
        }
        self.initial_rate * self.decay_rate.powf(exponent)
    }
}

/// 分段常数：`step <= boundaries[0]`时取`values[0]`，
/// `boundaries[i-1] < step <= boundaries[i]`时取`values[i]`，超过最后一个边界时取`values`的末项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPiecewiseConstant")]
pub struct PiecewiseConstant {
    boundaries: Vec<usize>,
    values: Vec<f64>,
}

// 反序列化时同样经过`PiecewiseConstant::new`的校验
#[derive(Deserialize)]
struct RawPiecewiseConstant {
    boundaries: Vec<usize>,
    values: Vec<f64>,
}

impl TryFrom<RawPiecewiseConstant> for PiecewiseConstant {
    type Error = OptimizerError;

    fn try_from(raw: RawPiecewiseConstant) -> Result<Self, Self::Error> {
        Self::new(&raw.boundaries, &raw.values)
    }
}

impl PiecewiseConstant {
    pub fn new(boundaries: &[usize], values: &[f64]) -> Result<Self, OptimizerError> {
        if values.len() != boundaries.len() + 1 {
            return Err(OptimizerError::ShapeMismatch {
                name: "values".to_string(),
                expected: vec![boundaries.len() + 1],
                got: vec![values.len()],
            });
        }
        if let Some(i) = (1..boundaries.len()).find(|&i| boundaries[i] <= boundaries[i - 1]) {
            return Err(OptimizerError::InvalidConfiguration {
                name: format!("boundaries[{i}]"),
                value: boundaries[i] as f64,
                operator: ComparisonOperator::GreaterThan,
                threshold: boundaries[i - 1] as f64,
            });
        }
        Ok(Self {
            boundaries: boundaries.to_vec(),
            values: values.to_vec(),
        })
    }
}

impl LearningRateSchedule for PiecewiseConstant {
    fn rate(&self, step: usize) -> f64 {
        let segment = self.boundaries.iter().take_while(|&&b| step > b).count();
        self.values[segment]
    }
}

/// 优化器使用的学习率
pub enum LearningRate {
    Constant(f64),
    Scheduled(Box<dyn LearningRateSchedule>),
}

impl LearningRate {
    /// 由标量张量（任意精度）构造固定学习率
    pub fn from_tensor(tensor: &Tensor) -> Result<Self, OptimizerError> {
        tensor
            .number()
            .map(LearningRate::Constant)
            .ok_or_else(|| OptimizerError::ShapeMismatch {
                name: "learning_rate".to_string(),
                expected: vec![],
                got: tensor.shape().to_vec(),
            })
    }

    pub fn scheduled(schedule: impl LearningRateSchedule + 'static) -> Self {
        LearningRate::Scheduled(Box::new(schedule))
    }

    /// 第`step`步（从0开始）应使用的学习率
    pub fn rate_at(&self, step: usize) -> f64 {
        match self {
            LearningRate::Constant(rate) => *rate,
            LearningRate::Scheduled(schedule) => schedule.rate(step),
        }
    }
}

impl fmt::Debug for LearningRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningRate::Constant(rate) => f.debug_tuple("Constant").field(rate).finish(),
            LearningRate::Scheduled(_) => f.write_str("Scheduled(..)"),
        }
    }
}

impl From<f64> for LearningRate {
    fn from(rate: f64) -> Self {
        LearningRate::Constant(rate)
    }
}

impl From<f32> for LearningRate {
    fn from(rate: f32) -> Self {
        LearningRate::Constant(f64::from(rate))
    }
}

impl From<ExponentialDecay> for LearningRate {
    fn from(schedule: ExponentialDecay) -> Self {
        LearningRate::scheduled(schedule)
    }
}

impl From<PiecewiseConstant> for LearningRate {
    fn from(schedule: PiecewiseConstant) -> Self {
        LearningRate::scheduled(schedule)
    }
}
