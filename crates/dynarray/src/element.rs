//! Fixed-width element codecs for [`TypedArray`](crate::TypedArray).

/// A value with a fixed byte representation.
///
/// Implementations must write and read exactly [`WIDTH`](Self::WIDTH)
/// bytes. Provided for the primitive integers and floats using native
/// endianness, which matches what a C caller sees through the raw
/// pointers of the byte API.
pub trait Element: Copy {
    /// Encoded size in bytes. Must be non-zero.
    const WIDTH: usize;

    /// Encode `self` into `out`, which is exactly `WIDTH` bytes long.
    fn write_bytes(&self, out: &mut [u8]);

    /// Decode a value from `bytes`, which is exactly `WIDTH` bytes long.
    fn read_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn write_bytes(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                #[inline]
                fn read_bytes(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_element!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: Element + PartialEq + std::fmt::Debug>(value: T) {
        let mut buf = vec![0u8; T::WIDTH];
        value.write_bytes(&mut buf);
        assert_eq!(T::read_bytes(&buf), value);
    }

    #[test]
    fn widths_match_size_of() {
        assert_eq!(u8::WIDTH, 1);
        assert_eq!(i32::WIDTH, 4);
        assert_eq!(f64::WIDTH, 8);
        assert_eq!(u128::WIDTH, 16);
    }

    #[test]
    fn primitives_survive_encoding() {
        round_trip(0xABu8);
        round_trip(-12345i32);
        round_trip(u64::MAX);
        round_trip(1.5f32);
        round_trip(-0.25f64);
    }

    #[test]
    fn encoding_is_native_endian() {
        let mut buf = [0u8; 4];
        7i32.write_bytes(&mut buf);
        assert_eq!(buf, 7i32.to_ne_bytes());
    }
}
