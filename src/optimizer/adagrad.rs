/*
 * @Author       : 老董
 * @Date         : 2026-10-14 09:12:37
 * @Description  : Adagrad 优化器：为每个变量维护一个“accumulator”槽位，
 *                 多次调用`apply_gradients`时复用同一批槽位
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 15:27:18
 */

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::config::AdagradConfig;
use super::gradient::Gradient;
use super::learning_rate::LearningRate;
use super::updater::{
    AdagradUpdater, DEFAULT_INITIAL_ACCUMULATOR_VALUE, TensorNames, check_initial_accumulator_value,
};
use crate::errors::{ComparisonOperator, OptimizerError};
use crate::tensor::Tensor;
use crate::variable::{Variable, VariableId};

/// 累加器槽位的名字
pub const ACCUMULATOR_SLOT: &str = "accumulator";

#[derive(Debug)]
struct Slot {
    variable_name: String,
    accumulator: Tensor,
}

/// 优化器状态的内存快照（步数 + 以变量名为键的累加器），可用`serde`自行持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdagradState {
    pub step: usize,
    pub accumulators: BTreeMap<String, Tensor>,
}

/// Adagrad 优化器
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = Adagrad::new_default(3.0)?;
/// let grad = Gradient::dense(Tensor::new(&[0.1, 0.1], &[2]));
/// optimizer.apply_gradients([(&grad, &mut var)])?;
/// ```
#[derive(Debug)]
pub struct Adagrad {
    learning_rate: LearningRate,
    initial_accumulator_value: f64,
    slots: HashMap<VariableId, Slot>,
    /// 已完成的`apply_gradients`次数
    step: usize,
}

impl Adagrad {
    /// 创建新的 Adagrad 优化器；`initial_accumulator_value`须为正数
    pub fn new(
        learning_rate: impl Into<LearningRate>,
        initial_accumulator_value: f64,
    ) -> Result<Self, OptimizerError> {
        check_initial_accumulator_value(initial_accumulator_value)?;
        let learning_rate = learning_rate.into();
        log::debug!(
            "创建Adagrad优化器：学习率{learning_rate:?}，累加器初始值{initial_accumulator_value}"
        );
        Ok(Self {
            learning_rate,
            initial_accumulator_value,
            slots: HashMap::new(),
            step: 0,
        })
    }

    /// 使用默认的累加器初始值（0.1）创建
    pub fn new_default(learning_rate: impl Into<LearningRate>) -> Result<Self, OptimizerError> {
        Self::new(learning_rate, DEFAULT_INITIAL_ACCUMULATOR_VALUE)
    }

    pub fn from_config(config: &AdagradConfig) -> Result<Self, OptimizerError> {
        config.validate()?;
        Self::new(config.learning_rate_policy()?, config.initial_accumulator_value)
    }

    /// 本优化器为每个变量维护的槽位名
    pub fn slot_names(&self) -> &'static [&'static str] {
        &[ACCUMULATOR_SLOT]
    }

    /// 获取某变量的槽位；该变量尚未参与过更新或槽位名未知时返回None
    pub fn get_slot(&self, variable: &Variable, slot_name: &str) -> Option<&Tensor> {
        if slot_name != ACCUMULATOR_SLOT {
            return None;
        }
        self.slots.get(&variable.id()).map(|slot| &slot.accumulator)
    }

    /// 对每一对（梯度，变量）执行一步 Adagrad 更新。
    ///
    /// 所有配对都先通过校验（精度、形状）后才会修改任何变量或累加器；
    /// 首次出现的变量会在校验通过后创建其累加器槽位。
    /// 多次调用共享同一批累加器，因此交替调用与按顺序连续调用的结果一致
    pub fn apply_gradients<'a, I>(&mut self, grads_and_vars: I) -> Result<(), OptimizerError>
    where
        I: IntoIterator<Item = (&'a Gradient, &'a mut Variable)>,
    {
        let mut pairs: Vec<(&Gradient, &mut Variable)> = grads_and_vars.into_iter().collect();
        let learning_rate = self.learning_rate.rate_at(self.step);

        let mut new_slots: HashMap<VariableId, Slot> = HashMap::new();
        for (gradient, variable) in &pairs {
            let gradient_name = gradient
                .name()
                .map_or_else(|| format!("{}的梯度", variable.name()), str::to_string);
            let accumulator_name = format!("{}/{ACCUMULATOR_SLOT}", variable.name());
            let names = TensorNames {
                parameter: variable.name(),
                accumulator: &accumulator_name,
                gradient: &gradient_name,
            };
            let accumulator = match self.slots.get(&variable.id()) {
                Some(slot) => &slot.accumulator,
                None => {
                    let slot = Slot {
                        variable_name: variable.name().to_string(),
                        accumulator: AdagradUpdater::initialize(
                            variable.shape(),
                            self.initial_accumulator_value,
                            variable.dtype(),
                        )?,
                    };
                    &new_slots.entry(variable.id()).or_insert(slot).accumulator
                }
            };
            AdagradUpdater::validate(names, variable.value(), accumulator, gradient)?;
        }

        for (id, slot) in new_slots {
            log::debug!(
                "为变量`{}`创建累加器槽位，形状{:?}",
                slot.variable_name,
                slot.accumulator.shape()
            );
            self.slots.insert(id, slot);
        }

        for (gradient, variable) in pairs.iter_mut() {
            let slot = self
                .slots
                .get_mut(&variable.id())
                .ok_or_else(|| OptimizerError::SlotNotFound(variable.name().to_string()))?;
            log::trace!(
                "第{}步：以学习率{}更新变量`{}`（{}梯度）",
                self.step,
                learning_rate,
                variable.name(),
                if gradient.is_sparse() { "稀疏" } else { "稠密" }
            );
            AdagradUpdater::apply_validated(
                variable.value_mut(),
                &mut slot.accumulator,
                gradient,
                learning_rate,
            )?;
        }

        self.step += 1;
        Ok(())
    }

    /// 将所有累加器重置为初始值，并将步数清零
    pub fn reset(&mut self) {
        for slot in self.slots.values_mut() {
            slot.accumulator = Tensor::full(
                slot.accumulator.shape(),
                self.initial_accumulator_value,
                slot.accumulator.dtype(),
            );
        }
        self.step = 0;
    }

    /// 当前步应使用的学习率
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate.rate_at(self.step)
    }

    pub fn set_learning_rate(&mut self, learning_rate: impl Into<LearningRate>) {
        self.learning_rate = learning_rate.into();
    }

    pub fn initial_accumulator_value(&self) -> f64 {
        self.initial_accumulator_value
    }

    /// 已完成的更新步数
    pub fn step(&self) -> usize {
        self.step
    }

    /// 导出状态快照（以变量名为键，变量名须互不相同）
    pub fn state_dict(&self) -> AdagradState {
        let mut accumulators = BTreeMap::new();
        for slot in self.slots.values() {
            if accumulators
                .insert(slot.variable_name.clone(), slot.accumulator.clone())
                .is_some()
            {
                log::warn!(
                    "变量名`{}`重复，状态快照中只保留其中一个累加器",
                    slot.variable_name
                );
            }
        }
        AdagradState {
            step: self.step,
            accumulators,
        }
    }

    /// 从快照恢复`variables`的累加器与步数。
    /// 任一变量缺少累加器或累加器的精度、形状、取值不合法时报错，且不做任何修改
    pub fn load_state_dict(
        &mut self,
        state: &AdagradState,
        variables: &[&Variable],
    ) -> Result<(), OptimizerError> {
        let mut restored = Vec::with_capacity(variables.len());
        for variable in variables {
            let accumulator = state
                .accumulators
                .get(variable.name())
                .ok_or_else(|| OptimizerError::SlotNotFound(variable.name().to_string()))?;
            let accumulator_name = format!("{}/{ACCUMULATOR_SLOT}", variable.name());
            if accumulator.dtype() != variable.dtype() {
                return Err(OptimizerError::PrecisionMismatch {
                    name: accumulator_name,
                    expected: variable.dtype(),
                    got: accumulator.dtype(),
                });
            }
            if accumulator.shape() != variable.shape() {
                return Err(OptimizerError::ShapeMismatch {
                    name: accumulator_name,
                    expected: variable.shape().to_vec(),
                    got: accumulator.shape().to_vec(),
                });
            }
            if let Some(&value) = accumulator
                .to_vec()
                .iter()
                .find(|&&v| !v.is_finite() || v <= 0.0)
            {
                return Err(OptimizerError::InvalidConfiguration {
                    name: accumulator_name,
                    value,
                    operator: ComparisonOperator::GreaterThan,
                    threshold: 0.0,
                });
            }
            restored.push((
                variable.id(),
                Slot {
                    variable_name: variable.name().to_string(),
                    accumulator: accumulator.clone(),
                },
            ));
        }

        self.slots.extend(restored);
        self.step = state.step;
        Ok(())
    }
}
