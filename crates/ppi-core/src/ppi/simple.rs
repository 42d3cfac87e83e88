//! Per-pixel channel mean.

use crate::plane::Plane;
use crate::stack::ChannelStack;

/// `ppi[y, x] = mean_c(channel_c[y, x])`
pub(crate) fn simple(stack: &ChannelStack) -> Plane {
    stack.mean_plane()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_channels_give_their_mean() {
        let stack = ChannelStack::new(vec![
            Plane::filled(5, 4, 100.0),
            Plane::filled(5, 4, 150.0),
            Plane::filled(5, 4, 200.0),
        ])
        .unwrap();
        let ppi = simple(&stack);
        assert_eq!(ppi.shape(), (4, 5));
        assert!(ppi.as_slice().iter().all(|&v| (v - 150.0).abs() < 1e-12));
    }

    #[test]
    fn test_single_channel_is_identity() {
        let plane = Plane::from_fn(3, 3, |y, x| (y * 3 + x) as f64);
        let stack = ChannelStack::new(vec![plane.clone()]).unwrap();
        assert_eq!(simple(&stack), plane);
    }
}
