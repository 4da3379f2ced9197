//! Rotation decisions.
//!
//! Pure logic: given what the writer currently has open and what the clock
//! and the file system report, decide whether a new file is needed and
//! which generation to start probing from.

use std::path::Path;

/// What the writer currently has open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Current<'a> {
    /// Time bucket of the open file, empty before the first open
    pub base: &'a str,
    /// Generation of the open file
    pub generation: u32,
    /// Whether a file handle is open
    pub open: bool,
}

/// Thresholds that can force a new file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rules {
    /// Size in bytes at which the current file is rotated, `0` disables
    pub rotation_size: u64,
    /// Never append to an existing file when entering a new bucket
    pub force_new_file: bool,
}

/// File the writer should switch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Time bucket name
    pub base: String,
    /// First generation to consider
    pub generation: u32,
    /// Skip names that already exist on disk
    pub probe: bool,
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Keep writing to the open file.
    Keep,
    /// Open a new file.
    Open(Target),
}

/// Decide whether to switch files.
///
/// `size` is the current file's size if it could be read. `forced` is set
/// for explicit rotation requests.
///
/// | situation | result |
/// |---|---|
/// | nothing open, or bucket changed | generation 0, probe only if size-triggered or `force_new_file` |
/// | same bucket, size threshold reached or forced | next generation, probe |
/// | otherwise | keep |
#[must_use]
pub fn decide(
    current: &Current<'_>,
    candidate: &str,
    size: Option<u64>,
    rules: Rules,
    forced: bool,
) -> Decision {
    let size_reached = rules.rotation_size > 0 && size.is_some_and(|s| s >= rules.rotation_size);

    if !current.open || candidate != current.base {
        return Decision::Open(Target {
            base: candidate.to_string(),
            generation: 0,
            probe: size_reached || rules.force_new_file,
        });
    }

    if !forced && !size_reached {
        return Decision::Keep;
    }

    Decision::Open(Target {
        base: candidate.to_string(),
        generation: current.generation.saturating_add(1),
        probe: true,
    })
}

/// File name for `generation` of `base`: the bare base for generation 0,
/// `base.N` otherwise.
#[must_use]
pub fn generation_name(base: &str, generation: u32) -> String {
    if generation == 0 {
        base.to_string()
    } else {
        format!("{base}.{generation}")
    }
}

/// First generation from `start` whose name `exists` reports as free.
///
/// The check and the later create are not atomic; a concurrent creator can
/// still claim the returned name.
pub fn next_free_name<F>(base: &str, start: u32, exists: F) -> (String, u32)
where
    F: Fn(&Path) -> bool,
{
    let mut generation = start;
    loop {
        let name = generation_name(base, generation);
        if !exists(Path::new(&name)) || generation == u32::MAX {
            return (name, generation);
        }
        generation += 1;
    }
}
