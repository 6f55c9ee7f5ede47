/// Address-indexed, auto-growing byte store. Writes may arrive out of order
/// (origin jumps, re-emission in pass 2); gaps are zero-filled and overwrites
/// are allowed. Content is only final once pass 2 completes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    image: Vec<u8>,
    lowest: Option<u16>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `bytes` starting at absolute `location`, growing and
    /// zero-filling the image as needed.
    pub fn insert(&mut self, bytes: &[u8], location: u16) {
        if bytes.is_empty() {
            return;
        }
        let start = location as usize;
        let end = start + bytes.len();
        if self.image.len() < end {
            self.image.resize(end, 0);
        }
        self.image[start..end].copy_from_slice(bytes);
        self.lowest = Some(self.lowest.map_or(location, |lo| lo.min(location)));
    }

    /// The emitted region, from the lowest written address to the highest.
    pub fn image(&self) -> &[u8] {
        match self.lowest {
            Some(lo) => &self.image[lo as usize..],
            None => &[],
        }
    }

    /// Address of the first emitted byte.
    pub fn base(&self) -> Option<u16> {
        self.lowest
    }

    pub fn get(&self, addr: u16) -> u8 {
        self.image.get(addr as usize).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.image().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lowest.is_none()
    }

    pub fn clear(&mut self) {
        self.image.clear();
        self.lowest = None;
    }
}
