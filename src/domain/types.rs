// ==========================================
// 库存二维码系统 - 领域类型定义
// ==========================================
// 职责: 数量标记值 / 箱数规则标识
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 数量 (Quantity)
// ==========================================
// 源表格用 0 / 负数 / "-" 表示"数量由 Box 列推导"
// 这里显式建模为 Unset,不再用魔法值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quantity {
    Known(u32), // 已知数量；Known(0) 与 Unset 同义
    #[default]
    Unset, // 未填写,由 Box 列推导
}

impl Quantity {
    /// 是否为"未填写"标记（数量 0 同样视为未填写）
    pub fn is_unset(&self) -> bool {
        matches!(self, Quantity::Unset | Quantity::Known(0))
    }

    /// 落为最终记录中的数量（Unset → 0）
    pub fn resolve(&self) -> u32 {
        match self {
            Quantity::Known(n) => *n,
            Quantity::Unset => 0,
        }
    }
}

impl From<u32> for Quantity {
    /// 0 即未填写
    fn from(value: u32) -> Self {
        if value == 0 {
            Quantity::Unset
        } else {
            Quantity::Known(value)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Known(n) => write!(f, "{}", n),
            Quantity::Unset => write!(f, "-"),
        }
    }
}

// ==========================================
// 箱数规则 (Box Rule)
// ==========================================
// 记录一行数据命中的展开规则（按优先级顺序编号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoxRule {
    NoBox,            // 规则1: 无 Box 值
    BoxAsQuantity,    // 规则2: 数量未填,Box 即数量
    CountPlusPartial, // 规则3: "整箱数+尾箱数量"
    BoxCount,         // 规则4: Box 为箱数
    Ignored,          // 规则5: Box 无法识别,忽略
}

impl fmt::Display for BoxRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxRule::NoBox => write!(f, "NO_BOX"),
            BoxRule::BoxAsQuantity => write!(f, "BOX_AS_QUANTITY"),
            BoxRule::CountPlusPartial => write!(f, "COUNT_PLUS_PARTIAL"),
            BoxRule::BoxCount => write!(f, "BOX_COUNT"),
            BoxRule::Ignored => write!(f, "IGNORED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_resolve() {
        assert_eq!(Quantity::Known(500).resolve(), 500);
        assert_eq!(Quantity::Unset.resolve(), 0);
    }

    #[test]
    fn test_known_zero_counts_as_unset() {
        assert!(Quantity::Known(0).is_unset());
        assert!(Quantity::Unset.is_unset());
        assert!(!Quantity::Known(1).is_unset());
    }

    #[test]
    fn test_quantity_from_zero_is_unset() {
        assert_eq!(Quantity::from(0), Quantity::Unset);
        assert_eq!(Quantity::from(7), Quantity::Known(7));
    }

    #[test]
    fn test_box_rule_display() {
        assert_eq!(BoxRule::CountPlusPartial.to_string(), "COUNT_PLUS_PARTIAL");
    }
}
