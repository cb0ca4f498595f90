// src/mem.rs
//! 内存复制/填充原语
//!
//! Ultiparc 不支持非对齐访存指令（lwl, lwr, swl, swr），而 MIPS-I 工具链
//! 自带的 memcpy/memset 会用到它们。这里逐字节访问内存，每次访问都是
//! volatile，编译器既不能把它合并成字访问，也不能把循环改写回 memcpy 调用。

use core::ptr;

/// 从 `src` 复制 `n` 个字节到 `dst`，按地址递增逐字节进行，返回 `dst`
///
/// 源与目标重叠时结果未定义。
///
/// # Safety
///
/// `src` 必须可读 `n` 字节，`dst` 必须可写 `n` 字节
pub unsafe fn mem_copy(dst: *mut u8, src: *const u8, n: usize) -> *mut u8 {
    let mut i = 0;
    while i < n {
        ptr::write_volatile(dst.add(i), ptr::read_volatile(src.add(i)));
        i += 1;
    }
    dst
}

/// 用 `value` 的低 8 位填充从 `dst` 开始的 `n` 个字节，返回 `dst`
///
/// # Safety
///
/// `dst` 必须可写 `n` 字节
pub unsafe fn mem_fill(dst: *mut u8, value: i32, n: usize) -> *mut u8 {
    let byte = value as u8;
    let mut i = 0;
    while i < n {
        ptr::write_volatile(dst.add(i), byte);
        i += 1;
    }
    dst
}

/// 复制 `min(dst.len(), src.len())` 个字节，返回复制的字节数
pub fn copy_bytes(dst: &mut [u8], src: &[u8]) -> usize {
    let n = dst.len().min(src.len());
    unsafe {
        mem_copy(dst.as_mut_ptr(), src.as_ptr(), n);
    }
    n
}

pub fn fill_bytes(dst: &mut [u8], value: u8) {
    unsafe {
        mem_fill(dst.as_mut_ptr(), value as i32, dst.len());
    }
}

/// 覆盖工具链提供的 memcpy/memset
#[cfg(all(feature = "mem-builtins", arch_mips32))]
mod builtins {
    #[no_mangle]
    pub unsafe extern "C" fn memcpy(dst: *mut u8, src: *const u8, n: usize) -> *mut u8 {
        super::mem_copy(dst, src, n)
    }

    #[no_mangle]
    pub unsafe extern "C" fn memset(s: *mut u8, c: i32, n: usize) -> *mut u8 {
        super::mem_fill(s, c, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_copy_four_bytes() {
        let src = [0x01u8, 0x02, 0x03, 0x04];
        let mut dst = [0xEEu8; 5];

        let ret = unsafe { mem_copy(dst.as_mut_ptr(), src.as_ptr(), 4) };
        assert_eq!(ret, dst.as_mut_ptr());
        assert_eq!(dst, [0x01, 0x02, 0x03, 0x04, 0xEE]);
    }

    #[test]
    fn test_copy_zero_is_noop() {
        let src = [1u8, 2, 3];
        let mut dst = [9u8; 3];

        unsafe { mem_copy(dst.as_mut_ptr(), src.as_ptr(), 0) };
        assert_eq!(dst, [9, 9, 9]);
    }

    #[test]
    fn test_copy_unaligned() {
        let src: [u8; 16] = core::array::from_fn(|i| i as u8 + 1);
        let mut dst = [0u8; 16];

        unsafe { mem_copy(dst.as_mut_ptr().add(3), src.as_ptr().add(1), 11) };
        assert_eq!(&dst[..3], &[0, 0, 0]);
        assert_eq!(&dst[3..14], &src[1..12]);
        assert_eq!(&dst[14..], &[0, 0]);
    }

    #[test]
    fn test_fill_uses_low_byte() {
        let mut buf = [0u8; 6];

        let ret = unsafe { mem_fill(buf.as_mut_ptr().add(1), 0x1234_56AB, 4) };
        assert_eq!(ret, unsafe { buf.as_mut_ptr().add(1) });
        assert_eq!(buf, [0, 0xAB, 0xAB, 0xAB, 0xAB, 0]);

        unsafe { mem_fill(buf.as_mut_ptr(), -1, 1) };
        assert_eq!(buf[0], 0xFF);
    }

    #[test]
    fn test_fill_sizes() {
        let mut buf = [0x55u8; 4097];

        unsafe { mem_fill(buf.as_mut_ptr(), 0x7F, 0) };
        assert!(buf.iter().all(|b| *b == 0x55));

        fill_bytes(&mut buf[..1], 0x7F);
        assert_eq!(buf[0], 0x7F);
        assert_eq!(buf[1], 0x55);

        fill_bytes(&mut buf[..4096], 0x00);
        assert!(buf[..4096].iter().all(|b| *b == 0));
        assert_eq!(buf[4096], 0x55);
    }

    #[test]
    fn test_copy_bytes_short_source() {
        let mut dst = [0u8; 8];
        assert_eq!(copy_bytes(&mut dst, b"abc"), 3);
        assert_eq!(&dst, b"abc\0\0\0\0\0");
    }

    proptest! {
        #[test]
        fn copy_stops_at_n(src in proptest::collection::vec(any::<u8>(), 0..256), guard in any::<u8>()) {
            let n = src.len();
            let mut dst = vec![guard; n + 1];

            unsafe { mem_copy(dst.as_mut_ptr(), src.as_ptr(), n) };
            prop_assert_eq!(&dst[..n], &src[..]);
            prop_assert_eq!(dst[n], guard);
        }

        #[test]
        fn fill_stops_at_n(value in any::<i32>(), n in 0usize..512) {
            let mut buf = vec![!(value as u8); n + 1];

            unsafe { mem_fill(buf.as_mut_ptr(), value, n) };
            prop_assert!(buf[..n].iter().all(|b| *b == value as u8));
            prop_assert_eq!(buf[n], !(value as u8));
        }
    }
}
