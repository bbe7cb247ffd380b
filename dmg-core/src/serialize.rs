use crate::cpu::Cpu;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Formatter;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveStateError {
    #[error("error serializing/deserializing state: {source}")]
    Serialization {
        #[from]
        source: bincode::Error,
    },
    #[error("error reading/writing state: {source}")]
    FileSystem {
        #[from]
        source: io::Error,
    },
}

pub fn serialize_array<S, T, const N: usize>(
    array: &[T; N],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut state = serializer.serialize_tuple(N)?;
    for value in array {
        state.serialize_element(value)?;
    }
    state.end()
}

struct DeserializeArrayVisitor<T, const N: usize> {
    marker: PhantomData<T>,
}

impl<T, const N: usize> DeserializeArrayVisitor<T, N> {
    fn new() -> Self {
        Self { marker: PhantomData }
    }
}

impl<'de, T, const N: usize> Visitor<'de> for DeserializeArrayVisitor<T, N>
where
    T: Deserialize<'de> + Default + Copy,
{
    type Value = [T; N];

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "an array of size {N}")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut array = [T::default(); N];

        for (i, value) in array.iter_mut().enumerate() {
            let Some(elem) = seq.next_element()? else {
                return Err(de::Error::custom(format!(
                    "expected array to have {N} elements, only got {i}",
                )));
            };

            *value = elem;
        }

        if seq.next_element::<T>()?.is_some() {
            return Err(de::Error::custom(format!("array has more than {N} elements")));
        }

        Ok(array)
    }
}

pub fn deserialize_array<'de, D, T, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default + Copy,
{
    deserializer.deserialize_tuple(N, DeserializeArrayVisitor::new())
}

/// Save states sit next to the ROM they were taken from, with an `ss0` extension.
pub fn determine_save_state_path<P>(rom_path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    rom_path.as_ref().with_extension("ss0")
}

/// Snapshot the full processor state: registers, halt/interrupt bits, and every byte of the
/// address space including the boot overlay flag.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn save_state(cpu: &Cpu) -> Result<Vec<u8>, SaveStateError> {
    Ok(bincode::serialize(cpu)?)
}

/// # Errors
///
/// Returns an error if the bytes are not a valid save state.
pub fn load_state(bytes: &[u8]) -> Result<Cpu, SaveStateError> {
    Ok(bincode::deserialize(bytes)?)
}

/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn save_state_to_file<P>(cpu: &Cpu, path: P) -> Result<(), SaveStateError>
where
    P: AsRef<Path>,
{
    let serialized_state = save_state(cpu)?;
    fs::write(path.as_ref(), serialized_state)?;

    log::info!("Successfully wrote save state to '{}'", path.as_ref().display());

    Ok(())
}

/// # Errors
///
/// Returns an error if the file cannot be read or does not contain a valid save state.
pub fn load_state_from_file<P>(path: P) -> Result<Cpu, SaveStateError>
where
    P: AsRef<Path>,
{
    let serialized_state = fs::read(path.as_ref())?;
    let cpu = load_state(&serialized_state)?;

    log::info!("Successfully loaded save state from '{}'", path.as_ref().display());

    Ok(cpu)
}
