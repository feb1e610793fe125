use std::sync::atomic::{AtomicUsize, Ordering};

use crate::tensor::{DType, Tensor};

static NEXT_VARIABLE_ID: AtomicUsize = AtomicUsize::new(0);

/// 变量的唯一标识。优化器据此为每个变量维护独立的累加器槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

/// 可训练的参数变量：一个带名字的张量。
/// 注：变量不可克隆，以保证同一`VariableId`只对应一份参数存储
#[derive(Debug)]
pub struct Variable {
    id: VariableId,
    name: String,
    value: Tensor,
}

impl Variable {
    /// 创建变量；未给出`name`时自动命名为`Variable_<id>`
    pub fn new(value: Tensor, name: Option<&str>) -> Self {
        let id = VariableId(NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed));
        let name = name.map_or_else(|| format!("Variable_{}", id.0), str::to_string);
        Variable { id, name, value }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Tensor {
        &self.value
    }

    /// 直接改写变量值（如由外部初始化器赋值）
    pub fn value_mut(&mut self) -> &mut Tensor {
        &mut self.value
    }

    pub fn dtype(&self) -> DType {
        self.value.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_naming() {
        let named = Variable::new(Tensor::new(&[1.0], &[1]), Some("bad_var"));
        assert_eq!(named.name(), "bad_var");

        let unnamed = Variable::new(Tensor::new(&[1.0], &[1]), None);
        assert!(unnamed.name().starts_with("Variable_"));
        assert_ne!(named.id(), unnamed.id());
    }

    #[test]
    fn test_variable_properties() {
        let var = Variable::new(Tensor::new_f64(&[1.0, 2.0], &[2, 1]), None);
        assert_eq!(var.dtype(), DType::F64);
        assert_eq!(var.shape(), &[2, 1]);
    }
}
