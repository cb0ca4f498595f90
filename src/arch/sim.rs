// src/arch/sim.rs
//! 模拟硬件 - 主机侧测试使用的 [`Architecture`] 实现
//!
//! 模拟内容：
//! 1. CP0 Status（IE 位以及其余任意位）
//! 2. 64 位自由运行计数器，高半部分可选"读低位时锁存"或实时读取
//! 3. 控制设备的寄存器窗口
//! 4. 可注入的中断：在指定次数的计数器访问之后挂起，IE 置位时立即进入

use super::Architecture;
use crate::soc::CTRL_IOBASE;
use spin::Mutex;

/// 复位后的 Status 值：CU0 + 全部 IM 位 + IE
pub const DEFAULT_STATUS: u32 = 0x1000_FF01;

/// 寄存器窗口大小（字节），覆盖整个控制设备
pub const REG_WINDOW_SIZE: usize = 0x200;

const REG_WORDS: usize = REG_WINDOW_SIZE / 4;

const STATUS_IE: u32 = 0x0000_0001;

/// 计数器高半部分的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighHalf {
    /// 读低 32 位时锁存高 32 位，之后读高位返回锁存值
    LatchedOnLowRead,
    /// 读高位时直接取计数器当前值
    Live,
}

struct SimState {
    status: u32,
    count: u64,
    latched_hi: u32,
    high_half: HighHalf,
    cycles_per_access: u64,
    // (剩余访问次数, 中断处理耗费的周期)
    scheduled: Option<(u32, u64)>,
    pending: Option<u64>,
    delivered: u32,
    prid: u32,
    regs: [u32; REG_WORDS],
}

impl SimState {
    /// 每次计数器访问之后调用
    fn tick(&mut self) {
        self.count = self.count.wrapping_add(self.cycles_per_access);

        if let Some((remaining, isr_cycles)) = self.scheduled {
            if remaining <= 1 {
                self.scheduled = None;
                self.pending = Some(isr_cycles);
            } else {
                self.scheduled = Some((remaining - 1, isr_cycles));
            }
        }

        self.deliver();
    }

    /// IE 置位时进入挂起的中断
    fn deliver(&mut self) {
        if self.status & STATUS_IE == 0 {
            return;
        }
        if let Some(isr_cycles) = self.pending.take() {
            self.count = self.count.wrapping_add(isr_cycles);
            // 中断处理程序自己也读了一次计数器
            if self.high_half == HighHalf::LatchedOnLowRead {
                self.latched_hi = (self.count >> 32) as u32;
            }
            self.delivered += 1;
        }
    }

    fn slot(addr: usize) -> usize {
        let offset = addr
            .checked_sub(CTRL_IOBASE)
            .filter(|off| *off < REG_WINDOW_SIZE && off % 4 == 0);
        match offset {
            Some(off) => off / 4,
            None => panic!("[SIM] access outside register window: 0x{:x}", addr),
        }
    }
}

/// 模拟 CPU
pub struct SimCpu {
    state: Mutex<SimState>,
}

impl SimCpu {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                status: DEFAULT_STATUS,
                count: 0,
                latched_hi: 0,
                high_half: HighHalf::LatchedOnLowRead,
                cycles_per_access: 0,
                scheduled: None,
                pending: None,
                delivered: 0,
                prid: 0,
                regs: [0; REG_WORDS],
            }),
        }
    }

    pub fn status(&self) -> u32 {
        self.state.lock().status
    }

    pub fn set_status(&self, status: u32) {
        let mut s = self.state.lock();
        s.status = status;
        s.deliver();
    }

    /// 计数器真实值
    pub fn count(&self) -> u64 {
        self.state.lock().count
    }

    pub fn set_count(&self, count: u64) {
        let mut s = self.state.lock();
        s.count = count;
        s.latched_hi = (count >> 32) as u32;
    }

    pub fn set_high_half(&self, mode: HighHalf) {
        self.state.lock().high_half = mode;
    }

    /// 每次计数器访问后计数器前进的周期数
    pub fn set_cycles_per_access(&self, cycles: u64) {
        self.state.lock().cycles_per_access = cycles;
    }

    /// 在第 `after_accesses` 次计数器访问之后挂起一个中断，
    /// 其处理程序耗费 `isr_cycles` 个周期并读取一次计数器
    pub fn schedule_interrupt(&self, after_accesses: u32, isr_cycles: u64) {
        let mut s = self.state.lock();
        if after_accesses == 0 {
            s.pending = Some(isr_cycles);
            s.deliver();
        } else {
            s.scheduled = Some((after_accesses, isr_cycles));
        }
    }

    /// 已进入的中断数
    pub fn interrupts_delivered(&self) -> u32 {
        self.state.lock().delivered
    }

    pub fn set_cpu_id(&self, prid: u32) {
        self.state.lock().prid = prid;
    }

    /// 直接读寄存器窗口，不经过 [`Architecture`]
    pub fn peek(&self, addr: usize) -> u32 {
        self.state.lock().regs[SimState::slot(addr)]
    }

    /// 直接写寄存器窗口（用于预置只读寄存器）
    pub fn poke(&self, addr: usize, value: u32) {
        self.state.lock().regs[SimState::slot(addr)] = value;
    }
}

impl Default for SimCpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Architecture for SimCpu {
    fn interrupts_enabled(&self) -> bool {
        self.state.lock().status & STATUS_IE != 0
    }

    fn enable_interrupts(&self) {
        let mut s = self.state.lock();
        s.status |= STATUS_IE;
        s.deliver();
    }

    fn disable_interrupts(&self) -> bool {
        let mut s = self.state.lock();
        let prev = s.status;
        s.status = prev & !STATUS_IE;
        prev & STATUS_IE != 0
    }

    fn restore_interrupts(&self, enabled: bool) {
        let mut s = self.state.lock();
        s.status = (s.status & !STATUS_IE) | enabled as u32;
        s.deliver();
    }

    fn read_tsc_lo(&self) -> u32 {
        let mut s = self.state.lock();
        let lo = s.count as u32;
        if s.high_half == HighHalf::LatchedOnLowRead {
            s.latched_hi = (s.count >> 32) as u32;
        }
        s.tick();
        lo
    }

    fn read_tsc_hi(&self) -> u32 {
        let mut s = self.state.lock();
        let hi = match s.high_half {
            HighHalf::LatchedOnLowRead => s.latched_hi,
            HighHalf::Live => (s.count >> 32) as u32,
        };
        s.tick();
        hi
    }

    fn cpu_id(&self) -> u32 {
        self.state.lock().prid
    }

    unsafe fn read_reg(&self, addr: usize) -> u32 {
        self.peek(addr)
    }

    unsafe fn write_reg(&self, addr: usize, value: u32) {
        self.poke(addr, value)
    }

    fn reset(&self) -> ! {
        panic!("[SIM] soft reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latched_high_half() {
        let cpu = SimCpu::new();
        cpu.set_count(0x0000_0001_FFFF_FFFF);
        cpu.set_cycles_per_access(1);

        let lo = cpu.read_tsc_lo();
        // 计数器已经进位，但高位返回锁存值
        assert_eq!(cpu.count(), 0x0000_0002_0000_0000);
        assert_eq!(cpu.read_tsc_hi(), 1);
        assert_eq!(lo, 0xFFFF_FFFF);
    }

    #[test]
    fn test_live_high_half() {
        let cpu = SimCpu::new();
        cpu.set_high_half(HighHalf::Live);
        cpu.set_count(0x0000_0001_FFFF_FFFF);
        cpu.set_cycles_per_access(1);

        assert_eq!(cpu.read_tsc_lo(), 0xFFFF_FFFF);
        assert_eq!(cpu.read_tsc_hi(), 2);
    }

    #[test]
    fn test_pending_interrupt_waits_for_ie() {
        let cpu = SimCpu::new();
        assert!(cpu.disable_interrupts());

        cpu.schedule_interrupt(1, 100);
        cpu.read_tsc_lo();
        assert_eq!(cpu.interrupts_delivered(), 0);
        assert_eq!(cpu.count(), 0);

        cpu.restore_interrupts(true);
        assert_eq!(cpu.interrupts_delivered(), 1);
        assert_eq!(cpu.count(), 100);
    }

    #[test]
    #[should_panic]
    fn test_access_outside_window() {
        let cpu = SimCpu::new();
        cpu.peek(CTRL_IOBASE + REG_WINDOW_SIZE);
    }
}
