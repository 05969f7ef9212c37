quantity!(WattHours, i64, "Wh");

impl WattHours {
    /// The value itself if positive, otherwise zero.
    pub const fn positive_part(self) -> Self {
        if self.0 > 0 { self } else { Self::ZERO }
    }
}
