//! The ordered multispectral channel stack.

use crate::error::{CoreError, Result};
use crate::plane::Plane;

/// N co-registered single-band images sharing one `(height, width)`.
///
/// A stack is validated once at construction and read-only afterwards;
/// every downstream stage borrows it. Each channel carries a label (the
/// loader uses the band's file stem, e.g. `"410nm"`) so results can be
/// written back under the same names.
///
/// # Example
///
/// ```
/// use ppi_core::{ChannelStack, Plane};
///
/// let stack = ChannelStack::new(vec![
///     Plane::filled(4, 3, 100.0),
///     Plane::filled(4, 3, 200.0),
/// ])
/// .unwrap();
///
/// assert_eq!(stack.len(), 2);
/// assert_eq!(stack.shape(), (3, 4));
/// assert_eq!(stack.mean_plane().get(0, 0), 150.0);
/// ```
#[derive(Debug, Clone)]
pub struct ChannelStack {
    channels: Vec<Plane>,
    labels: Vec<String>,
}

impl ChannelStack {
    /// Create a stack with generated labels (`channel_0`, `channel_1`, ...).
    pub fn new(channels: Vec<Plane>) -> Result<Self> {
        let labels = (0..channels.len()).map(|i| format!("channel_{i}")).collect();
        Self::with_labels(channels, labels)
    }

    /// Create a stack with one label per channel.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InputNotFound`] when `channels` is empty
    /// - [`CoreError::ShapeMismatch`] when any channel differs from the first
    /// - [`CoreError::InvalidParameter`] when label and channel counts differ
    pub fn with_labels(channels: Vec<Plane>, labels: Vec<String>) -> Result<Self> {
        let first = channels
            .first()
            .ok_or_else(|| CoreError::InputNotFound("channel stack is empty".to_string()))?;
        let shape = first.shape();
        if let Some(bad) = channels.iter().find(|c| c.shape() != shape) {
            return Err(CoreError::shape("channel stack", shape, bad.shape()));
        }
        if labels.len() != channels.len() {
            return Err(CoreError::InvalidParameter(format!(
                "{} labels given for {} channels",
                labels.len(),
                channels.len()
            )));
        }
        Ok(Self { channels, labels })
    }

    /// Number of channels (always at least one).
    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Construction rejects empty stacks, so this only guards hand-built values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Shared `(height, width)` of every channel.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.channels[0].shape()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.channels[0].width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.channels[0].height()
    }

    pub fn channels(&self) -> &[Plane] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&Plane> {
        self.channels.get(index)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Plane)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.channels.iter())
    }

    /// Per-pixel arithmetic mean across the channel axis.
    pub fn mean_plane(&self) -> Plane {
        let (height, width) = self.shape();
        let mut sum = vec![0.0; width * height];
        for channel in &self.channels {
            for (acc, &v) in sum.iter_mut().zip(channel.as_slice()) {
                *acc += v;
            }
        }
        let n = self.channels.len() as f64;
        for acc in &mut sum {
            *acc /= n;
        }
        Plane::from_parts(sum, width, height)
    }
}
