// src/tsc.rs
//! 时间戳计数器 - 由两个 32 位 CP0 寄存器组成的 64 位自由运行计数器
//!
//! 必须先读低位：硬件在读低位时锁存高位。若硬件不提供这种锁存，
//! `read_unsafe` 在低位进位时就会得到错误结果，而不仅仅是偶尔撕裂。

use crate::arch::Architecture;
use crate::irq;

#[inline(always)]
pub fn read_low<A: Architecture + ?Sized>(hw: &A) -> u32 {
    hw.read_tsc_lo()
}

#[inline(always)]
pub fn read_high<A: Architecture + ?Sized>(hw: &A) -> u32 {
    hw.read_tsc_hi()
}

#[inline(always)]
fn compose(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

/// 读取 64 位计数器，两次读取之间可能被中断打断
#[inline]
pub fn read_unsafe<A: Architecture + ?Sized>(hw: &A) -> u64 {
    let lo = read_low(hw);
    let hi = read_high(hw);
    compose(hi, lo)
}

/// 读取 64 位计数器（关中断）
#[inline]
pub fn read_safe<A: Architecture + ?Sized>(hw: &A) -> u64 {
    let token = irq::interrupts_disable(hw);
    let lo = read_low(hw);
    let hi = read_high(hw);
    irq::interrupts_restore(hw, token);
    compose(hi, lo)
}

/// 两次采样之间经过的周期数（按模 2^64 计算）
#[inline]
pub fn elapsed(earlier: u64, later: u64) -> u64 {
    later.wrapping_sub(earlier)
}

/// 周期数换算为微秒，`sys_freq_hz` 为 0 时返回 0，超出 u64 时饱和
pub fn cycles_to_micros(cycles: u64, sys_freq_hz: u32) -> u64 {
    if sys_freq_hz == 0 {
        return 0;
    }
    let micros = cycles as u128 * 1_000_000 / sys_freq_hz as u128;
    u64::try_from(micros).unwrap_or(u64::MAX)
}
