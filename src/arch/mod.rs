// src/arch/mod.rs
//! 架构抽象层
//!
//! 所有特权指令序列（CP0 读写、跳转复位）只出现在具体架构实现里，
//! 上层模块通过 [`Architecture`] trait 访问硬件。

#[cfg(arch_mips32)]
#[path = "mips32/mod.rs"]
pub mod imp;

#[cfg(arch_mips32)]
pub use imp::Ultiparc;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

/// 架构名称
#[cfg(arch_mips32)]
pub const ARCH_NAME: &str = "mips32";

#[cfg(not(arch_mips32))]
pub const ARCH_NAME: &str = "host";

/// 硬件句柄 trait
///
/// 一个实现代表一颗 CPU 以及它的内存映射 I/O 空间。句柄通过引用显式传递，
/// 测试中可以替换为 [`sim::SimCpu`]。
pub trait Architecture {
    /// Status.IE 当前是否置位
    fn interrupts_enabled(&self) -> bool;

    /// 置位 Status.IE，其余位保持不变
    fn enable_interrupts(&self);

    /// 在一次不可分割的 CP0 读-改-写中清除 Status.IE，返回之前的 IE 位
    fn disable_interrupts(&self) -> bool;

    /// 先清除 Status.IE，再或上 `enabled`，其余位保持不变
    fn restore_interrupts(&self, enabled: bool);

    /// 时间戳计数器低 32 位（CP0 $8）
    fn read_tsc_lo(&self) -> u32;

    /// 时间戳计数器高 32 位（CP0 $9）
    fn read_tsc_hi(&self) -> u32;

    /// CP0 PRId
    fn cpu_id(&self) -> u32;

    /// 32 位 volatile 读
    ///
    /// # Safety
    ///
    /// `addr` 必须是本 SoC 寄存器映射中的地址
    unsafe fn read_reg(&self, addr: usize) -> u32;

    /// 32 位 volatile 写
    ///
    /// # Safety
    ///
    /// `addr` 必须是本 SoC 寄存器映射中的可写地址
    unsafe fn write_reg(&self, addr: usize, value: u32);

    /// 软复位：跳转到地址 0
    fn reset(&self) -> !;
}
