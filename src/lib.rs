// src/lib.rs
//! Ultiparc / UltiSoC 硬件访问层
//!
//! - `regs`：固定物理地址上的有序 32 位读写
//! - `irq`：全局中断使能位的关闭/恢复协议
//! - `tsc`：64 位时间戳计数器（普通读取与关中断读取）
//! - `mem`：不使用非对齐访存指令的 memcpy/memset
//! - `soc`：控制设备寄存器映射与绑定层使用的外观
//!
//! 所有操作都显式接收硬件句柄（实现了 [`arch::Architecture`] 的值），
//! 目标板上是 `arch::Ultiparc`，主机测试中是 `arch::sim::SimCpu`。
#![cfg_attr(not(test), no_std)]
#![cfg_attr(arch_mips32, feature(asm_experimental_arch))]

pub mod arch;
pub mod error;
pub mod irq;
pub mod mem;
pub mod regs;
pub mod soc;
pub mod tsc;

pub use arch::Architecture;
pub use error::HalError;
pub use irq::{CriticalSection, IrqToken};
pub use soc::{LedPattern, Soc, SocInfo, SocRegister};

/// 构建信息
pub mod version {
    include!(concat!(env!("OUT_DIR"), "/version.rs"));
}
