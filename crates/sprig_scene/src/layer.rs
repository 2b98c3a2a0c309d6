use bitflags::bitflags;

bitflags! {
    /// Render layers. A node is drawn by every camera whose render layers
    /// share at least one bit with the node's layer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Layer: u64 {
        const DEFAULT = 1 << 0;
        const UI      = 1 << 1;
    }
}

impl Layer {
    /// Every bit set, including ones with no named constant.
    pub const EVERYTHING: Layer = Layer::from_bits_retain(u64::MAX);

    /// A layer with the single bit `bit` set. `bit` must be below 64.
    pub const fn custom(bit: u32) -> Layer {
        assert!(bit < 64, "Layer::custom: bit index must be below 64");
        Layer::from_bits_retain(1 << bit)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Layer::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_intersects_custom_bits() {
        let custom = Layer::custom(40);
        assert!(Layer::EVERYTHING.intersects(custom));
        assert!(!Layer::DEFAULT.intersects(custom));
        assert!(!Layer::DEFAULT.intersects(Layer::UI));
    }

    #[test]
    fn highest_custom_bit_is_the_sign_bit() {
        assert_eq!(Layer::custom(63).bits(), 1 << 63);
    }

    #[test]
    #[should_panic(expected = "bit index must be below 64")]
    fn custom_bit_out_of_range_panics() {
        let _ = Layer::custom(64);
    }

    #[test]
    fn default_layer_is_default_bit() {
        assert_eq!(Layer::default(), Layer::DEFAULT);
    }
}
