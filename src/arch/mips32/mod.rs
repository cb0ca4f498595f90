// src/arch/mips32/mod.rs
//! Ultiparc (MIPS-I) 实现
//!
//! CP0 访问全部写成带 `.set noreorder` 的固定指令序列，延迟槽和
//! mtc0 冒险由显式 nop 填充。修改 Status 的序列不带 `nomem`，
//! 同时充当编译器内存屏障。

use core::arch::asm;
use core::sync::atomic::{AtomicBool, Ordering};

/// CP0 Status 中的全局中断使能位
pub const STATUS_IE: u32 = 0x0000_0001;

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Ultiparc 硬件句柄（单例）
pub struct Ultiparc {
    _private: (),
}

impl Ultiparc {
    /// 获取唯一的硬件句柄，第二次调用返回 `None`
    pub fn take() -> Option<Self> {
        // 单核，没有 ll/sc，load/store 即可
        if TAKEN.load(Ordering::Acquire) {
            return None;
        }
        TAKEN.store(true, Ordering::Release);
        Some(Self { _private: () })
    }

    /// 绕过单例检查创建句柄
    ///
    /// # Safety
    ///
    /// 调用者必须保证不会与另一个句柄交错使用临界区
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl super::Architecture for Ultiparc {
    fn interrupts_enabled(&self) -> bool {
        let status: u32;
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "mfc0 {0}, $12",
                "nop",
                ".set pop",
                out(reg) status,
                options(nomem, nostack),
            );
        }
        status & STATUS_IE != 0
    }

    fn enable_interrupts(&self) {
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "mfc0 {tmp}, $12",
                "nop",
                "ori {tmp}, {tmp}, 1",
                "mtc0 {tmp}, $12",
                "nop",
                "nop",
                ".set pop",
                tmp = out(reg) _,
                options(nostack),
            );
        }
    }

    fn disable_interrupts(&self) -> bool {
        let prev: u32;
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "mfc0 {prev}, $12",
                "addiu {tmp}, $zero, -2", // 延迟槽
                "and {tmp}, {prev}, {tmp}",
                "mtc0 {tmp}, $12",
                "nop",
                ".set pop",
                prev = out(reg) prev,
                tmp = out(reg) _,
                options(nostack),
            );
        }
        prev & STATUS_IE != 0
    }

    fn restore_interrupts(&self, enabled: bool) {
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "mfc0 {tmp}, $12",
                "addiu {mask}, $zero, -2",
                "and {tmp}, {tmp}, {mask}",
                "or {tmp}, {tmp}, {state}",
                "mtc0 {tmp}, $12",
                "nop",
                "nop",
                ".set pop",
                state = in(reg) enabled as u32,
                tmp = out(reg) _,
                mask = out(reg) _,
                options(nostack),
            );
        }
    }

    fn read_tsc_lo(&self) -> u32 {
        let v: u32;
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "mfc0 {0}, $8",
                "nop",
                ".set pop",
                out(reg) v,
                options(nomem, nostack),
            );
        }
        v
    }

    fn read_tsc_hi(&self) -> u32 {
        let v: u32;
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "mfc0 {0}, $9",
                "nop",
                ".set pop",
                out(reg) v,
                options(nomem, nostack),
            );
        }
        v
    }

    fn cpu_id(&self) -> u32 {
        let v: u32;
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "mfc0 {0}, $15",
                "nop",
                ".set pop",
                out(reg) v,
                options(nomem, nostack),
            );
        }
        v
    }

    unsafe fn read_reg(&self, addr: usize) -> u32 {
        core::ptr::read_volatile(addr as *const u32)
    }

    unsafe fn write_reg(&self, addr: usize, value: u32) {
        core::ptr::write_volatile(addr as *mut u32, value)
    }

    fn reset(&self) -> ! {
        unsafe {
            asm!(
                ".set push",
                ".set noreorder",
                "jr $zero",
                "nop",
                ".set pop",
                options(noreturn, nostack),
            );
        }
    }
}
