use std::fmt::{self, Debug, Display};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::ops::{Bound, Index, IndexMut, Range, RangeBounds};
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dump::Dump;
use crate::error::{MemoryError, Result};
use crate::{Address, Addressable, Byte, PARAGRAPH};

/// How the bytes of a new block are initialised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Init {
    Zero,
    /// Random bytes, from a fixed seed if one is given
    Random(Option<u64>),
    Fill(Byte),
    File(PathBuf),
}

/// A fixed-size block of memory answering for the inclusive address window `BEGIN..=END`
///
/// Byte 0 of the storage holds the value at `BEGIN`. Every access is bounds
/// checked against the window; nothing is ever clamped or truncated.
pub struct Memory<const BEGIN: Address, const END: Address> {
    bytes: Box<[Byte]>,
    /// Bytes per dump row, `min(SIZE, PARAGRAPH)`
    column_count: usize,
    rng: StdRng,
}

impl<const BEGIN: Address, const END: Address> Memory<BEGIN, END> {
    /// Number of bytes in the window
    pub const SIZE: usize = {
        assert!(BEGIN <= END, "memory window must satisfy BEGIN <= END");
        (END - BEGIN) as usize + 1
    };

    fn blank(rng: StdRng) -> Self {
        Self {
            bytes: vec![0; Self::SIZE].into_boxed_slice(),
            column_count: Self::SIZE.min(PARAGRAPH),
            rng,
        }
    }

    /// Create a zero-filled block
    pub fn new() -> Self {
        Self::blank(StdRng::from_rng(&mut rand::rng()))
    }

    /// Create a block filled with random bytes
    pub fn random() -> Self {
        Self::random_with(StdRng::from_rng(&mut rand::rng()))
    }

    /// Create a block filled with random bytes drawn from `rng`, which the block keeps for later calls to `randomize`
    pub fn random_with(rng: StdRng) -> Self {
        let mut memory = Self::blank(rng);
        memory.randomize();
        memory
    }

    /// Create a block with every byte set to `value`
    pub fn filled(value: Byte) -> Self {
        let mut memory = Self::new();
        memory.bytes.fill(value);
        memory
    }

    /// Create a block from the first `SIZE` bytes of the file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut memory = Self::new();
        memory.load(path)?;
        Ok(memory)
    }

    pub fn with_init(init: Init) -> Result<Self> {
        let memory = match init {
            Init::Zero => Self::new(),
            Init::Random(Some(seed)) => Self::random_with(StdRng::seed_from_u64(seed)),
            Init::Random(None) => Self::random(),
            Init::Fill(value) => Self::filled(value),
            Init::File(path) => Self::from_file(path)?,
        };
        Ok(memory)
    }

    pub const fn address_begin() -> Address {
        BEGIN
    }

    pub const fn address_end() -> Address {
        END
    }

    pub const fn size() -> usize {
        Self::SIZE
    }

    pub fn contains(address: Address) -> bool {
        (BEGIN..=END).contains(&address)
    }

    /// Read-only view of the whole block, index 0 being `BEGIN`
    pub fn as_slice(&self) -> &[Byte] {
        &self.bytes
    }

    fn offset(address: Address) -> Result<usize> {
        if Self::contains(address) {
            Ok((address - BEGIN) as usize)
        } else {
            Err(MemoryError::OutOfRange {
                address: address as usize,
                begin: BEGIN,
                end: END,
            })
        }
    }

    /// Resolve an absolute half-open span into storage offsets
    ///
    /// The span length is checked against the block size before the end points
    /// are checked against the window. A reversed span has no valid length and
    /// always reports as an overflow.
    fn span(operation: &'static str, range: impl RangeBounds<Address>) -> Result<Range<usize>> {
        let begin = match range.start_bound() {
            Bound::Included(&address) => address as usize,
            Bound::Excluded(&address) => address as usize + 1,
            Bound::Unbounded => BEGIN as usize,
        };
        let end = match range.end_bound() {
            Bound::Included(&address) => address as usize + 1,
            Bound::Excluded(&address) => address as usize,
            Bound::Unbounded => END as usize + 1,
        };

        let requested = end.wrapping_sub(begin);
        if begin > end || requested > Self::SIZE {
            return Err(MemoryError::Overflow {
                operation,
                requested,
                size: Self::SIZE,
            });
        }

        let out_of_range = |address| MemoryError::OutOfRange {
            address,
            begin: BEGIN,
            end: END,
        };
        if begin < BEGIN as usize {
            return Err(out_of_range(begin));
        }
        if end > END as usize + 1 {
            return Err(out_of_range(end));
        }

        Ok(begin - BEGIN as usize..end - BEGIN as usize)
    }

    pub fn read(&self, address: Address) -> Result<Byte> {
        Ok(self.bytes[Self::offset(address)?])
    }

    pub fn write(&mut self, address: Address, value: Byte) -> Result<()> {
        let offset = Self::offset(address)?;
        self.bytes[offset] = value;
        Ok(())
    }

    /// Set every byte in the block to `value`
    pub fn fill(&mut self, value: Byte) {
        self.bytes.fill(value);
    }

    /// Set every byte in the half-open span to `value`
    pub fn fill_range(&mut self, value: Byte, range: impl RangeBounds<Address>) -> Result<()> {
        let span = Self::span("fill", range)?;
        debug!(
            "fill ${:04X}..${:04X} with {:#04X}",
            span.start + BEGIN as usize,
            span.end + BEGIN as usize,
            value
        );
        self.bytes[span].fill(value);
        Ok(())
    }

    /// Overwrite every byte with a uniformly random value
    pub fn randomize(&mut self) {
        trace!("randomize ${:04X}..=${:04X}", BEGIN, END);
        self.rng.fill(&mut self.bytes[..]);
    }

    /// Overwrite every byte with a value drawn uniformly from `min..=max`
    pub fn randomize_range(&mut self, min: Byte, max: Byte) -> Result<()> {
        if min > max {
            return Err(MemoryError::EmptyRange { min, max });
        }
        trace!(
            "randomize ${:04X}..=${:04X} within {:#04X}..={:#04X}",
            BEGIN,
            END,
            min,
            max
        );
        for byte in self.bytes.iter_mut() {
            *byte = self.rng.random_range(min..=max);
        }
        Ok(())
    }

    /// Render the whole block as a hex and ASCII dump
    pub fn dump(&self) -> Dump<'_> {
        Dump {
            bytes: &self.bytes,
            origin: BEGIN as usize,
            columns: self.column_count,
        }
    }

    /// Render the half-open span as a hex and ASCII dump
    pub fn dump_range(&self, range: impl RangeBounds<Address>) -> Result<Dump<'_>> {
        let span = Self::span("dump", range)?;
        Ok(Dump {
            origin: span.start + BEGIN as usize,
            bytes: &self.bytes[span],
            columns: self.column_count,
        })
    }

    /// Replace the contents of the block with the first `SIZE` bytes of the file at `path`
    ///
    /// The file must hold at least `SIZE` bytes; anything past that is ignored.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MemoryError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file_size = fs::metadata(path)?.len();
        if file_size < Self::SIZE as u64 {
            return Err(MemoryError::SizeMismatch {
                path: path.to_path_buf(),
                file_size,
                memory_size: Self::SIZE,
            });
        }

        let mut bytes = vec![0; Self::SIZE].into_boxed_slice();
        File::open(path)?.read_exact(&mut bytes)?;
        self.bytes = bytes;
        debug!(
            "loaded {} bytes from {} into ${:04X}..=${:04X}",
            Self::SIZE,
            path.display(),
            BEGIN,
            END
        );
        Ok(())
    }

    /// Write the whole block to a new file at `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_range(path, ..)
    }

    /// Write the half-open span to a new file at `path`, refusing to overwrite an existing file
    pub fn save_range(&self, path: impl AsRef<Path>, range: impl RangeBounds<Address>) -> Result<()> {
        let span = Self::span("save", range)?;
        let path = path.as_ref();
        create_new_with(path, |file| file.write_all(&self.bytes[span.clone()]))?;

        debug!(
            "saved {} bytes from ${:04X} to {}",
            span.len(),
            span.start + BEGIN as usize,
            path.display()
        );
        Ok(())
    }
}

/// Create a file that must not exist yet and fill it with `write`
///
/// A file left incomplete by a failed `write` is removed again.
fn create_new_with(path: &Path, write: impl FnOnce(&mut File) -> io::Result<()>) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => MemoryError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => MemoryError::Io(e),
        })?;

    if let Err(e) = write(&mut file) {
        drop(file);
        if let Err(remove) = fs::remove_file(path) {
            warn!("could not remove partial file {}: {}", path.display(), remove);
        }
        return Err(e.into());
    }
    Ok(())
}

impl<const BEGIN: Address, const END: Address> Default for Memory<BEGIN, END> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BEGIN: Address, const END: Address> Index<Address> for Memory<BEGIN, END> {
    type Output = Byte;

    fn index(&self, address: Address) -> &Self::Output {
        match Self::offset(address) {
            Ok(offset) => &self.bytes[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<const BEGIN: Address, const END: Address> IndexMut<Address> for Memory<BEGIN, END> {
    fn index_mut(&mut self, address: Address) -> &mut Self::Output {
        match Self::offset(address) {
            Ok(offset) => &mut self.bytes[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<const BEGIN: Address, const END: Address> Addressable for Memory<BEGIN, END> {
    fn read(&self, address: Address) -> Result<Byte> {
        Memory::read(self, address)
    }

    fn write(&mut self, address: Address, value: Byte) -> Result<()> {
        Memory::write(self, address, value)
    }

    fn address_begin(&self) -> Address {
        BEGIN
    }

    fn address_end(&self) -> Address {
        END
    }
}

impl<const BEGIN: Address, const END: Address> Debug for Memory<BEGIN, END> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("begin", &BEGIN)
            .field("end", &END)
            .field("size", &Self::SIZE)
            .finish_non_exhaustive()
    }
}

impl<const BEGIN: Address, const END: Address> Display for Memory<BEGIN, END> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.dump(), f)
    }
}
