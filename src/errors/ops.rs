use std::fmt::{self, Display};

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    LessOrEqual,
    GreaterThan,
    LessThan,
    Equal,
    NotEqual,
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::LessOrEqual => "≤",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        };
        write!(f, "{}", operator_name)
    }
}

impl ComparisonOperator {
    /// 判断`value`与`threshold`是否满足本比较关系
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::GreaterOrEqual => value >= threshold,
            ComparisonOperator::LessOrEqual => value <= threshold,
            ComparisonOperator::GreaterThan => value > threshold,
            ComparisonOperator::LessThan => value < threshold,
            ComparisonOperator::Equal => value == threshold,
            ComparisonOperator::NotEqual => value != threshold,
        }
    }
}
