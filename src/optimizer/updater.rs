/*
 * @Author       : 老董
 * @Date         : 2026-10-13 10:41:05
 * @Description  : Adagrad 更新规则本身（纯函数，与任何计算图无关）：
 *                   accumulator = accumulator + g²
 *                   parameter   = parameter - lr * g / √accumulator
 *                 稠密梯度逐元素更新；稀疏梯度只更新列出的行，重复行先求和再更新。
 *                 所有校验（精度、形状）都在任何运算之前完成，校验失败时不做任何修改
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 16:50:44
 */

use ndarray::{Axis, Zip};

use super::gradient::{Gradient, IndexedSlices};
use crate::errors::{ComparisonOperator, OptimizerError};
use crate::tensor::{DType, Tensor};
use crate::utils::traits::float::FloatElement;

/// 累加器的默认初始值
pub const DEFAULT_INITIAL_ACCUMULATOR_VALUE: f64 = 0.1;

/// 一次更新所涉及的三个张量在错误信息中的名字
#[derive(Debug, Clone, Copy)]
pub(crate) struct TensorNames<'a> {
    pub parameter: &'a str,
    pub accumulator: &'a str,
    pub gradient: &'a str,
}

const DEFAULT_NAMES: TensorNames<'static> = TensorNames {
    parameter: "parameter",
    accumulator: "accumulator",
    gradient: "gradient",
};

impl<'a> TensorNames<'a> {
    fn anonymous(gradient: &'a Gradient) -> Self {
        Self {
            parameter: DEFAULT_NAMES.parameter,
            accumulator: DEFAULT_NAMES.accumulator,
            gradient: gradient.name().unwrap_or(DEFAULT_NAMES.gradient),
        }
    }
}

/// Adagrad 更新器。本身不持有任何状态：累加器由调用方传入，
/// 调用方复用同一个累加器即可在多次调用之间“共享”累积的梯度平方和
#[derive(Debug, Clone, Copy, Default)]
pub struct AdagradUpdater;

impl AdagradUpdater {
    /// 创建形状为`shape`、所有元素均为`initial_accumulator_value`的累加器。
    /// `initial_accumulator_value`转换为`dtype`精度后须仍为正的有限值
    pub fn initialize(
        shape: &[usize],
        initial_accumulator_value: f64,
        dtype: DType,
    ) -> Result<Tensor, OptimizerError> {
        check_accumulator_value_in(initial_accumulator_value, dtype)?;
        Ok(Tensor::full(shape, initial_accumulator_value, dtype))
    }

    /// 稠密更新，返回（新参数，新累加器），输入保持不变
    pub fn apply_dense(
        parameter: &Tensor,
        accumulator: &Tensor,
        gradient: &Tensor,
        learning_rate: f64,
    ) -> Result<(Tensor, Tensor), OptimizerError> {
        let names = DEFAULT_NAMES;
        validate_dense(names, parameter, accumulator, gradient)?;
        let (mut new_parameter, mut new_accumulator) = (parameter.clone(), accumulator.clone());
        dense_in_place(&mut new_parameter, &mut new_accumulator, gradient, learning_rate)?;
        Ok((new_parameter, new_accumulator))
    }

    /// 稀疏更新，返回（新参数，新累加器），输入保持不变
    pub fn apply_sparse(
        parameter: &Tensor,
        accumulator: &Tensor,
        gradient: &IndexedSlices,
        learning_rate: f64,
    ) -> Result<(Tensor, Tensor), OptimizerError> {
        let names = DEFAULT_NAMES;
        validate_sparse(names, parameter, accumulator, gradient)?;
        let (mut new_parameter, mut new_accumulator) = (parameter.clone(), accumulator.clone());
        sparse_in_place(&mut new_parameter, &mut new_accumulator, gradient, learning_rate)?;
        Ok((new_parameter, new_accumulator))
    }

    /// 按梯度类型分派到稠密或稀疏更新
    pub fn apply(
        parameter: &Tensor,
        accumulator: &Tensor,
        gradient: &Gradient,
        learning_rate: f64,
    ) -> Result<(Tensor, Tensor), OptimizerError> {
        Self::validate(TensorNames::anonymous(gradient), parameter, accumulator, gradient)?;
        let (mut new_parameter, mut new_accumulator) = (parameter.clone(), accumulator.clone());
        Self::apply_validated(&mut new_parameter, &mut new_accumulator, gradient, learning_rate)?;
        Ok((new_parameter, new_accumulator))
    }

    /// 原地更新。要求调用期间独占参数与累加器（由`&mut`保证）；
    /// 校验全部通过后才会写入
    pub fn apply_in_place(
        parameter: &mut Tensor,
        accumulator: &mut Tensor,
        gradient: &Gradient,
        learning_rate: f64,
    ) -> Result<(), OptimizerError> {
        Self::validate(TensorNames::anonymous(gradient), parameter, accumulator, gradient)?;
        Self::apply_validated(parameter, accumulator, gradient, learning_rate)
    }

    pub(crate) fn validate(
        names: TensorNames<'_>,
        parameter: &Tensor,
        accumulator: &Tensor,
        gradient: &Gradient,
    ) -> Result<(), OptimizerError> {
        match gradient {
            Gradient::Dense { values, .. } => validate_dense(names, parameter, accumulator, values),
            Gradient::Sparse { slices, .. } => {
                validate_sparse(names, parameter, accumulator, slices)
            }
        }
    }

    /// 须先通过`validate`
    pub(crate) fn apply_validated(
        parameter: &mut Tensor,
        accumulator: &mut Tensor,
        gradient: &Gradient,
        learning_rate: f64,
    ) -> Result<(), OptimizerError> {
        match gradient {
            Gradient::Dense { values, .. } => {
                dense_in_place(parameter, accumulator, values, learning_rate)
            }
            Gradient::Sparse { slices, .. } => {
                sparse_in_place(parameter, accumulator, slices, learning_rate)
            }
        }
    }
}

pub(crate) fn check_initial_accumulator_value(value: f64) -> Result<(), OptimizerError> {
    check_accumulator_value_in(value, DType::F64)
}

// 以`dtype`精度存储后再判断：f32下1e-50会下溢为0，1e39会上溢为inf
fn check_accumulator_value_in(value: f64, dtype: DType) -> Result<(), OptimizerError> {
    let stored = match dtype {
        DType::F32 => f64::from(<f32 as FloatElement>::from_f64(value)),
        DType::F64 => value,
    };
    if stored.is_finite() && ComparisonOperator::GreaterThan.holds(stored, 0.0) {
        Ok(())
    } else {
        Err(OptimizerError::InvalidConfiguration {
            name: "initial_accumulator_value".to_string(),
            value,
            operator: ComparisonOperator::GreaterThan,
            threshold: 0.0,
        })
    }
}

//↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓校验↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
fn check_dtype(name: &str, expected: DType, got: DType) -> Result<(), OptimizerError> {
    if expected == got {
        Ok(())
    } else {
        Err(OptimizerError::PrecisionMismatch {
            name: name.to_string(),
            expected,
            got,
        })
    }
}

fn check_shape(name: &str, expected: &[usize], got: &[usize]) -> Result<(), OptimizerError> {
    if expected == got {
        Ok(())
    } else {
        Err(OptimizerError::ShapeMismatch {
            name: name.to_string(),
            expected: expected.to_vec(),
            got: got.to_vec(),
        })
    }
}

// 先查精度，再查形状：以参数为基准
fn validate_common(
    names: TensorNames<'_>,
    parameter: &Tensor,
    accumulator: &Tensor,
    gradient_dtype: DType,
) -> Result<(), OptimizerError> {
    check_dtype(names.gradient, parameter.dtype(), gradient_dtype)?;
    check_dtype(names.accumulator, parameter.dtype(), accumulator.dtype())?;
    check_shape(names.accumulator, parameter.shape(), accumulator.shape())
}

fn validate_dense(
    names: TensorNames<'_>,
    parameter: &Tensor,
    accumulator: &Tensor,
    gradient: &Tensor,
) -> Result<(), OptimizerError> {
    validate_common(names, parameter, accumulator, gradient.dtype())?;
    check_shape(names.gradient, parameter.shape(), gradient.shape())
}

// `IndexedSlices`在构造时已保证行索引不越界、值的形状与`dense_shape`相符
fn validate_sparse(
    names: TensorNames<'_>,
    parameter: &Tensor,
    accumulator: &Tensor,
    gradient: &IndexedSlices,
) -> Result<(), OptimizerError> {
    validate_common(names, parameter, accumulator, gradient.dtype())?;
    check_shape(names.gradient, parameter.shape(), gradient.dense_shape())
}
//↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑校验↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

//↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓计算核↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
#[inline]
fn adagrad_step<T: FloatElement>(parameter: &mut T, accumulator: &mut T, gradient: T, lr: T) {
    *accumulator = *accumulator + gradient * gradient;
    *parameter = *parameter - lr * gradient / accumulator.sqrt();
}

fn mismatch<T: FloatElement>(name: &str, got: DType) -> OptimizerError {
    OptimizerError::PrecisionMismatch {
        name: name.to_string(),
        expected: T::DTYPE,
        got,
    }
}

fn dense_in_place(
    parameter: &mut Tensor,
    accumulator: &mut Tensor,
    gradient: &Tensor,
    learning_rate: f64,
) -> Result<(), OptimizerError> {
    match parameter.dtype() {
        DType::F32 => dense_kernel::<f32>(parameter, accumulator, gradient, learning_rate),
        DType::F64 => dense_kernel::<f64>(parameter, accumulator, gradient, learning_rate),
    }
}

fn dense_kernel<T: FloatElement>(
    parameter: &mut Tensor,
    accumulator: &mut Tensor,
    gradient: &Tensor,
    learning_rate: f64,
) -> Result<(), OptimizerError> {
    let (parameter_dtype, accumulator_dtype) = (parameter.dtype(), accumulator.dtype());
    let g = gradient
        .as_array::<T>()
        .ok_or_else(|| mismatch::<T>("gradient", gradient.dtype()))?;
    let a = accumulator
        .as_array_mut::<T>()
        .ok_or_else(|| mismatch::<T>("accumulator", accumulator_dtype))?;
    let p = parameter
        .as_array_mut::<T>()
        .ok_or_else(|| mismatch::<T>("parameter", parameter_dtype))?;
    let lr = T::from_f64(learning_rate);
    Zip::from(p)
        .and(a)
        .and(g)
        .for_each(|p, a, &g| adagrad_step(p, a, g, lr));
    Ok(())
}

fn sparse_in_place(
    parameter: &mut Tensor,
    accumulator: &mut Tensor,
    gradient: &IndexedSlices,
    learning_rate: f64,
) -> Result<(), OptimizerError> {
    match parameter.dtype() {
        DType::F32 => sparse_kernel::<f32>(parameter, accumulator, gradient, learning_rate),
        DType::F64 => sparse_kernel::<f64>(parameter, accumulator, gradient, learning_rate),
    }
}

fn sparse_kernel<T: FloatElement>(
    parameter: &mut Tensor,
    accumulator: &mut Tensor,
    gradient: &IndexedSlices,
    learning_rate: f64,
) -> Result<(), OptimizerError> {
    if gradient.has_duplicate_indices() {
        log::trace!("稀疏梯度含重复行索引{:?}，将先求和再更新", gradient.indices());
    }
    let (parameter_dtype, accumulator_dtype) = (parameter.dtype(), accumulator.dtype());
    let rows = gradient
        .merged_rows::<T>()
        .ok_or_else(|| mismatch::<T>("gradient", gradient.dtype()))?;
    let a = accumulator
        .as_array_mut::<T>()
        .ok_or_else(|| mismatch::<T>("accumulator", accumulator_dtype))?;
    let p = parameter
        .as_array_mut::<T>()
        .ok_or_else(|| mismatch::<T>("parameter", parameter_dtype))?;
    let lr = T::from_f64(learning_rate);
    for (row, g_row) in rows {
        Zip::from(p.index_axis_mut(Axis(0), row))
            .and(a.index_axis_mut(Axis(0), row))
            .and(&g_row)
            .for_each(|p, a, &g| adagrad_step(p, a, g, lr));
    }
    Ok(())
}
//↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑计算核↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑
