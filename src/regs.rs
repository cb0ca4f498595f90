// src/regs.rs
//! 寄存器访问 - 固定物理地址上的 32 位有序读写

use crate::arch::Architecture;
use core::marker::PhantomData;

/// 读取物理地址上的 32 位寄存器
///
/// # Safety
///
/// `addr` 必须是 SoC 寄存器映射中的地址
#[inline(always)]
pub unsafe fn read_register<A: Architecture + ?Sized>(hw: &A, addr: usize) -> u32 {
    hw.read_reg(addr)
}

/// 向物理地址上的 32 位寄存器写入
///
/// # Safety
///
/// `addr` 必须是 SoC 寄存器映射中的可写地址
#[inline(always)]
pub unsafe fn write_register<A: Architecture + ?Sized>(hw: &A, addr: usize, value: u32) {
    hw.write_reg(addr, value)
}

/// 访问权限标记
pub mod access {
    pub struct ReadOnly;
    pub struct ReadWrite;
}

/// 固定地址上的寄存器
///
/// 只能由本 crate 的寄存器映射构造，因此读写本身是安全的。
pub struct Register<Access = access::ReadOnly> {
    addr: usize,
    _access: PhantomData<Access>,
}

impl<Access> Register<Access> {
    pub(crate) const fn new(addr: usize) -> Self {
        Self { addr, _access: PhantomData }
    }

    pub const fn address(&self) -> usize {
        self.addr
    }

    #[inline(always)]
    pub fn read<A: Architecture + ?Sized>(&self, hw: &A) -> u32 {
        unsafe { read_register(hw, self.addr) }
    }
}

impl Register<access::ReadWrite> {
    #[inline(always)]
    pub fn write<A: Architecture + ?Sized>(&self, hw: &A, value: u32) {
        unsafe { write_register(hw, self.addr, value) }
    }
}
