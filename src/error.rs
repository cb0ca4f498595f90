// src/error.rs
//! 外观层错误类型
//!
//! 核心层（寄存器、中断、计数器、内存原语）没有可恢复错误，
//! 这里只覆盖按名称访问寄存器和主机整数转换时的校验。

use crate::soc::SocRegister;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// 寄存器名称不存在
    UnknownRegister,
    /// 寄存器只读
    ReadOnly(SocRegister),
    /// 数值超出寄存器宽度
    ValueOutOfRange(i64),
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            HalError::UnknownRegister => write!(f, "Unknown register"),
            HalError::ReadOnly(reg) => write!(f, "Register {} is read-only", reg.name()),
            HalError::ValueOutOfRange(v) => write!(f, "Value {} out of range", v),
        }
    }
}
