// src/soc.rs
//! SoC 控制设备 - 寄存器映射与对外操作
//!
//! 寄存器布局必须与硬件逐字节一致。

use crate::arch::Architecture;
use crate::error::HalError;
use crate::regs::{self, access, Register};
use crate::tsc;
use core::str::FromStr;

/* 控制设备 */
pub const CTRL_IOBASE: usize = 0x8010_0000; /* 控制设备 I/O 基址 */
pub const CTRL_SOCVER: usize = CTRL_IOBASE + 0x000; /* SoC 版本（只读） */
pub const CTRL_RAMBASE: usize = CTRL_IOBASE + 0x004; /* RAM 基址（只读） */
pub const CTRL_RAMSIZE: usize = CTRL_IOBASE + 0x008; /* RAM 大小（只读） */
pub const CTRL_ROMSIZE: usize = CTRL_IOBASE + 0x00C; /* ROM 大小（只读） */
pub const CTRL_SYSFREQ: usize = CTRL_IOBASE + 0x010; /* 系统频率（只读） */
pub const CTRL_LED: usize = CTRL_IOBASE + 0x100; /* LED 控制寄存器（读写） */

pub const SOCVER: Register<access::ReadOnly> = Register::new(CTRL_SOCVER);
pub const RAMBASE: Register<access::ReadOnly> = Register::new(CTRL_RAMBASE);
pub const RAMSIZE: Register<access::ReadOnly> = Register::new(CTRL_RAMSIZE);
pub const ROMSIZE: Register<access::ReadOnly> = Register::new(CTRL_ROMSIZE);
pub const SYSFREQ: Register<access::ReadOnly> = Register::new(CTRL_SYSFREQ);
pub const LED: Register<access::ReadWrite> = Register::new(CTRL_LED);

/// 按名称访问的寄存器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocRegister {
    SocVer,
    RamBase,
    RamSize,
    RomSize,
    SysFreq,
    Led,
}

impl SocRegister {
    pub const ALL: [SocRegister; 6] = [
        SocRegister::SocVer,
        SocRegister::RamBase,
        SocRegister::RamSize,
        SocRegister::RomSize,
        SocRegister::SysFreq,
        SocRegister::Led,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SocRegister::SocVer => "socver",
            SocRegister::RamBase => "rambase",
            SocRegister::RamSize => "ramsize",
            SocRegister::RomSize => "romsize",
            SocRegister::SysFreq => "sysfreq",
            SocRegister::Led => "led",
        }
    }

    pub const fn address(self) -> usize {
        match self {
            SocRegister::SocVer => CTRL_SOCVER,
            SocRegister::RamBase => CTRL_RAMBASE,
            SocRegister::RamSize => CTRL_RAMSIZE,
            SocRegister::RomSize => CTRL_ROMSIZE,
            SocRegister::SysFreq => CTRL_SYSFREQ,
            SocRegister::Led => CTRL_LED,
        }
    }

    pub const fn is_writable(self) -> bool {
        matches!(self, SocRegister::Led)
    }
}

impl FromStr for SocRegister {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocRegister::ALL
            .into_iter()
            .find(|reg| reg.name().eq_ignore_ascii_case(s))
            .ok_or(HalError::UnknownRegister)
    }
}

/// LED 位图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPattern(u32);

impl LedPattern {
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl From<u32> for LedPattern {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl TryFrom<i64> for LedPattern {
    type Error = HalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| HalError::ValueOutOfRange(value))
    }
}

/// SoC 信息快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocInfo {
    pub version: u32,
    pub ram_base: u32,
    pub ram_size: u32,
    pub rom_size: u32,
    pub sys_freq: u32,
}

impl core::fmt::Display for SocInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "UltiSoC 0x{:08x}: RAM 0x{:08x} + {}KB, ROM {}KB, {} Hz",
            self.version,
            self.ram_base,
            self.ram_size / 1024,
            self.rom_size / 1024,
            self.sys_freq
        )
    }
}

/// SoC 外观 - 借用硬件句柄，提供绑定层需要的全部操作
pub struct Soc<'hw, A: Architecture + ?Sized> {
    hw: &'hw A,
}

impl<'hw, A: Architecture + ?Sized> Soc<'hw, A> {
    pub fn new(hw: &'hw A) -> Self {
        Self { hw }
    }

    pub fn hw(&self) -> &'hw A {
        self.hw
    }

    pub fn socid(&self) -> u32 {
        SOCVER.read(self.hw)
    }

    pub fn ram_base(&self) -> u32 {
        RAMBASE.read(self.hw)
    }

    pub fn ram_size(&self) -> u32 {
        RAMSIZE.read(self.hw)
    }

    pub fn rom_size(&self) -> u32 {
        ROMSIZE.read(self.hw)
    }

    pub fn sys_freq(&self) -> u32 {
        SYSFREQ.read(self.hw)
    }

    pub fn info(&self) -> SocInfo {
        SocInfo {
            version: self.socid(),
            ram_base: self.ram_base(),
            ram_size: self.ram_size(),
            rom_size: self.rom_size(),
            sys_freq: self.sys_freq(),
        }
    }

    /// 读取并记录 SoC 信息
    pub fn probe(&self) -> SocInfo {
        let info = self.info();
        log::info!("[SOC] {}", info);
        log::info!("[SOC] CPU id: 0x{:08x}", self.cpuid());
        info
    }

    /// 64 位时间戳（关中断读取）
    pub fn cpu_tsc(&self) -> u64 {
        tsc::read_safe(self.hw)
    }

    /// 时间戳低 32 位
    pub fn cpu_tsc32(&self) -> u32 {
        tsc::read_low(self.hw)
    }

    pub fn uptime_micros(&self) -> u64 {
        tsc::cycles_to_micros(self.cpu_tsc(), self.sys_freq())
    }

    pub fn leds(&self) -> u32 {
        LED.read(self.hw)
    }

    /// 写入新的 LED 状态，返回之前的状态
    pub fn set_leds(&self, pattern: LedPattern) -> u32 {
        let prev = LED.read(self.hw);
        LED.write(self.hw, pattern.bits());
        log::debug!("[SOC] LED 0x{:x} -> 0x{:x}", prev, pattern.bits());
        prev
    }

    /// 返回当前 LED 状态；给出新值时先校验再写入
    pub fn update_leds(&self, new: Option<i64>) -> Result<u32, HalError> {
        match new {
            Some(value) => {
                let pattern = LedPattern::try_from(value)?;
                Ok(self.set_leds(pattern))
            }
            None => Ok(self.leds()),
        }
    }

    pub fn read_named(&self, reg: SocRegister) -> u32 {
        unsafe { regs::read_register(self.hw, reg.address()) }
    }

    pub fn write_named(&self, reg: SocRegister, value: u32) -> Result<(), HalError> {
        if !reg.is_writable() {
            return Err(HalError::ReadOnly(reg));
        }
        unsafe { regs::write_register(self.hw, reg.address(), value) };
        log::debug!("[SOC] {} <- 0x{:x}", reg.name(), value);
        Ok(())
    }

    pub fn cpuid(&self) -> u32 {
        self.hw.cpu_id()
    }

    /// 软复位，不会返回
    pub fn reset(&self) -> ! {
        log::warn!("[SOC] soft reset");
        self.hw.reset()
    }
}
