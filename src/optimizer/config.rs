/*
 * @Author       : 老董
 * @Date         : 2026-10-14 21:36:27
 * @Description  : Adagrad 优化器的配置（可由JSON读取）
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 17:22:58
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::learning_rate::{ExponentialDecay, LearningRate, PiecewiseConstant};
use super::updater::{DEFAULT_INITIAL_ACCUMULATOR_VALUE, check_initial_accumulator_value};
use crate::errors::{ComparisonOperator, ConfigError, OptimizerError};

const fn default_initial_accumulator_value() -> f64 {
    DEFAULT_INITIAL_ACCUMULATOR_VALUE
}

/// 学习率随步数变化的方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleConfig {
    /// 以`learning_rate`为初始值做指数衰减
    ExponentialDecay {
        decay_rate: f64,
        decay_steps: usize,
        #[serde(default)]
        staircase: bool,
    },
    /// `step <= boundaries[0]`时为`learning_rate`，之后依次取`values`中的值
    PiecewiseConstant {
        boundaries: Vec<usize>,
        values: Vec<f64>,
    },
}

/// # 示例
/// ```json
/// {
///     "learning_rate": 3.0,
///     "initial_accumulator_value": 0.1,
///     "schedule": { "type": "exponential_decay", "decay_rate": 0.96, "decay_steps": 100 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdagradConfig {
    pub learning_rate: f64,
    #[serde(default = "default_initial_accumulator_value")]
    pub initial_accumulator_value: f64,
    #[serde(default)]
    pub schedule: Option<ScheduleConfig>,
}

impl AdagradConfig {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            initial_accumulator_value: DEFAULT_INITIAL_ACCUMULATOR_VALUE,
            schedule: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("从{:?}读取Adagrad配置", path.as_ref());
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), OptimizerError> {
        require_positive("learning_rate", self.learning_rate)?;
        check_initial_accumulator_value(self.initial_accumulator_value)?;
        match &self.schedule {
            Some(ScheduleConfig::ExponentialDecay {
                decay_rate,
                decay_steps,
                ..
            }) => {
                require_positive("schedule.decay_rate", *decay_rate)?;
                require_positive("schedule.decay_steps", *decay_steps as f64)
            }
            Some(ScheduleConfig::PiecewiseConstant { .. }) => self.learning_rate_policy().map(|_| ()),
            None => Ok(()),
        }
    }

    /// 按配置构造学习率
    pub fn learning_rate_policy(&self) -> Result<LearningRate, OptimizerError> {
        Ok(match &self.schedule {
            None => LearningRate::Constant(self.learning_rate),
            Some(ScheduleConfig::ExponentialDecay {
                decay_rate,
                decay_steps,
                staircase,
            }) => ExponentialDecay {
                initial_rate: self.learning_rate,
                decay_rate: *decay_rate,
                decay_steps: *decay_steps,
                staircase: *staircase,
            }
            .into(),
            Some(ScheduleConfig::PiecewiseConstant { boundaries, values }) => {
                let mut all_values = Vec::with_capacity(values.len() + 1);
                all_values.push(self.learning_rate);
                all_values.extend_from_slice(values);
                PiecewiseConstant::new(boundaries, &all_values)?.into()
            }
        })
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), OptimizerError> {
    if value.is_finite() && ComparisonOperator::GreaterThan.holds(value, 0.0) {
        Ok(())
    } else {
        Err(OptimizerError::InvalidConfiguration {
            name: name.to_string(),
            value,
            operator: ComparisonOperator::GreaterThan,
            threshold: 0.0,
        })
    }
}
