/*
 * @Author       : 老董
 * @Date         : 2026-10-12 16:50:44
 * @Description  : 优化器模块：Adagrad 更新规则（稠密/稀疏）及其有状态的封装
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 11:08:33
 */

mod adagrad;
mod config;
mod gradient;
mod learning_rate;
mod updater;

#[cfg(test)]
mod tests;

pub use adagrad::{ACCUMULATOR_SLOT, Adagrad, AdagradState};
pub use config::{AdagradConfig, ScheduleConfig};
pub use gradient::{Gradient, IndexedSlices};
pub use learning_rate::{ExponentialDecay, LearningRate, LearningRateSchedule, PiecewiseConstant};
pub use updater::{AdagradUpdater, DEFAULT_INITIAL_ACCUMULATOR_VALUE};
