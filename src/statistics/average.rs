use crate::{prelude::*, quantity::energy::WattHours};

impl<T> RoundedMean for T where T: ?Sized {}

pub trait RoundedMean {
    /// Arithmetic mean rounded to the nearest watt-hour, halves away from zero.
    fn rounded_mean(self) -> Result<WattHours>
    where
        Self: Sized + IntoIterator<Item = WattHours>,
    {
        let (sum, count) =
            self.into_iter().fold((0_i64, 0_i64), |(sum, count), value| (sum + value.0, count + 1));
        ensure!(count != 0, "cannot average an empty series");
        Ok(WattHours(divide_rounded(sum, count)))
    }
}

/// Integer division rounding halves away from zero, the divisor must be positive.
const fn divide_rounded(dividend: i64, divisor: i64) -> i64 {
    let quotient = dividend / divisor;
    if 2 * (dividend % divisor).abs() >= divisor { quotient + dividend.signum() } else { quotient }
}
