//! # Only Adagrad
//!
//! `only_adagrad`用纯rust实现[Adagrad](https://jmlr.org/papers/v12/duchi11a.html)
//! 自适应梯度优化算法：每个参数的学习率按其历史梯度平方和的平方根反比缩放。
//!
//! - [`optimizer::AdagradUpdater`]：更新规则本身，是与计算图无关的纯函数（支持稠密与稀疏梯度）；
//! - [`optimizer::Adagrad`]：为每个变量维护累加器槽位、供训练循环反复调用的优化器；
//! - [`tensor::Tensor`]：带精度标记（f32/f64）的张量，精度不一致会在运算前报错。
//!

pub mod errors;
pub mod optimizer;
pub mod tensor;
pub mod utils;
pub mod variable;
