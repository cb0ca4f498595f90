// src/irq.rs
//! 中断控制 - 全局中断使能位的关闭/恢复协议
//!
//! `interrupts_disable` 返回的 [`IrqToken`] 记录之前的 IE 位，
//! `interrupts_restore` 按值消耗它。恢复不是计数：每次恢复都把 IE
//! 直接设为令牌中的值，所以嵌套的关闭/恢复必须严格按栈顺序配对。

use crate::arch::Architecture;

/// 关闭中断前的 IE 位
///
/// 只能由 [`interrupts_disable`] 产生，只能被 [`interrupts_restore`] 消耗。
#[must_use = "interrupts stay masked until the token is restored"]
#[derive(Debug)]
pub struct IrqToken {
    enabled: bool,
}

impl IrqToken {
    /// 关闭之前中断是否处于使能状态
    pub fn was_enabled(&self) -> bool {
        self.enabled
    }
}

#[inline(always)]
pub fn interrupts_enabled<A: Architecture + ?Sized>(hw: &A) -> bool {
    hw.interrupts_enabled()
}

#[inline(always)]
pub fn interrupts_enable<A: Architecture + ?Sized>(hw: &A) {
    hw.enable_interrupts()
}

#[inline(always)]
pub fn interrupts_disable<A: Architecture + ?Sized>(hw: &A) -> IrqToken {
    IrqToken { enabled: hw.disable_interrupts() }
}

#[inline(always)]
pub fn interrupts_restore<A: Architecture + ?Sized>(hw: &A, token: IrqToken) {
    hw.restore_interrupts(token.enabled)
}

/// 临界区守卫 - Drop 时恢复进入前的中断状态
pub struct CriticalSection<'hw, A: Architecture + ?Sized> {
    hw: &'hw A,
    token: Option<IrqToken>,
}

impl<'hw, A: Architecture + ?Sized> CriticalSection<'hw, A> {
    pub fn hw(&self) -> &'hw A {
        self.hw
    }
}

impl<A: Architecture + ?Sized> Drop for CriticalSection<'_, A> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            interrupts_restore(self.hw, token);
        }
    }
}

/// 关闭中断并返回守卫
#[must_use]
pub fn lock<A: Architecture + ?Sized>(hw: &A) -> CriticalSection<'_, A> {
    let token = interrupts_disable(hw);
    CriticalSection { hw, token: Some(token) }
}

/// 在关中断的状态下执行 `f`
pub fn free<A, F, R>(hw: &A, f: F) -> R
where
    A: Architecture + ?Sized,
    F: FnOnce(&CriticalSection<'_, A>) -> R,
{
    let cs = lock(hw);
    f(&cs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::sim::SimCpu;

    #[test]
    fn test_restore_is_noop() {
        for initial in [0x1000_FF01u32, 0x1000_FF00] {
            let cpu = SimCpu::new();
            cpu.set_status(initial);

            let token = interrupts_disable(&cpu);
            assert!(!interrupts_enabled(&cpu));
            assert_eq!(cpu.status(), initial & !1);

            interrupts_restore(&cpu, token);
            assert_eq!(cpu.status(), initial);
        }
    }

    #[test]
    fn test_restore_keeps_bits_changed_inside_section() {
        for initial in [0x1000_FF01u32, 0x1000_FF00] {
            let cpu = SimCpu::new();
            cpu.set_status(initial);

            let token = interrupts_disable(&cpu);
            let was_enabled = token.was_enabled();
            // 临界区内改写 IM/CU 位，IE 保持清零
            cpu.set_status(0x3000_0C00);

            interrupts_restore(&cpu, token);
            assert_eq!(cpu.status(), 0x3000_0C00 | was_enabled as u32);
            assert_eq!(interrupts_enabled(&cpu), initial & 1 != 0);
        }
    }

    #[test]
    fn test_enable_preserves_other_bits() {
        let cpu = SimCpu::new();
        cpu.set_status(0x0040_0C00);

        interrupts_enable(&cpu);
        assert_eq!(cpu.status(), 0x0040_0C01);
    }

    #[test]
    fn test_nested_stack_order() {
        let cpu = SimCpu::new();

        let outer = interrupts_disable(&cpu);
        let inner = interrupts_disable(&cpu);
        assert!(outer.was_enabled());
        assert!(!inner.was_enabled());

        interrupts_restore(&cpu, inner);
        assert!(!interrupts_enabled(&cpu));
        interrupts_restore(&cpu, outer);
        assert!(interrupts_enabled(&cpu));
    }

    #[test]
    fn test_nested_wrong_order_is_not_counted() {
        let cpu = SimCpu::new();

        let outer = interrupts_disable(&cpu);
        let inner = interrupts_disable(&cpu);

        interrupts_restore(&cpu, outer);
        assert!(interrupts_enabled(&cpu));
        // 最后恢复的是内层令牌：中断保持关闭
        interrupts_restore(&cpu, inner);
        assert!(!interrupts_enabled(&cpu));
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let cpu = SimCpu::new();
        {
            let _cs = lock(&cpu);
            assert!(!interrupts_enabled(&cpu));
            {
                let _inner = lock(&cpu);
            }
            assert!(!interrupts_enabled(&cpu));
        }
        assert!(interrupts_enabled(&cpu));
    }

    #[test]
    fn test_free_returns_value() {
        let cpu = SimCpu::new();
        cpu.set_status(0x1000_FF00);

        let seen = free(&cpu, |cs| interrupts_enabled(cs.hw()));
        assert!(!seen);
        assert_eq!(cpu.status(), 0x1000_FF00);
    }
}
