//! Marshaling a [`Presence`] into the native `DiscordRichPresence` layout.

use std::ffi::c_int;
use std::fmt;
use std::marker::PhantomData;

use discord_rpc_sys::DiscordRichPresence;

use crate::buffer::BufferSet;
use crate::error::Result;
use crate::presence::Presence;

/// A native presence record whose string fields point into a live [`BufferSet`].
///
/// The borrow ties the record to the builder that produced it, so the record
/// cannot be used after its buffers are released or rebuilt.
pub struct NativeRecord<'a> {
    raw: DiscordRichPresence,
    _buffers: PhantomData<&'a BufferSet>,
}

impl NativeRecord<'_> {
    /// The raw record, as the native library reads it.
    #[must_use]
    pub const fn as_raw(&self) -> &DiscordRichPresence {
        &self.raw
    }
}

impl fmt::Debug for NativeRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRecord").field("raw", &self.raw).finish()
    }
}

/// Builds native presence records and owns the buffers behind them.
///
/// At most one record is live per builder: each [`build`](Self::build) first
/// releases whatever the previous build allocated.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    buffers: BufferSet,
}

impl RecordBuilder {
    /// Create a builder with no live buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marshal `presence` into a native record.
    ///
    /// String fields are copied into fresh buffers (null when absent or
    /// empty). Timestamps and the instance flag are copied verbatim, party
    /// sizes saturate at `c_int::MAX` and party privacy becomes its integer
    /// encoding. Byte limits are
    /// not enforced here, see [`Presence::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if a
    /// field contains an interior NUL. No buffers stay live in that case.
    pub fn build(&mut self, presence: &Presence) -> Result<NativeRecord<'_>> {
        self.buffers.release_all();
        match self.marshal(presence) {
            Ok(raw) => Ok(NativeRecord {
                raw,
                _buffers: PhantomData,
            }),
            Err(e) => {
                self.buffers.release_all();
                Err(e)
            }
        }
    }

    /// Build a record, hand it to `f`, then release its buffers.
    ///
    /// Release happens on every exit path, including when `f` unwinds.
    pub(crate) fn scoped<R>(
        &mut self,
        presence: &Presence,
        f: impl FnOnce(&DiscordRichPresence) -> R,
    ) -> Result<R> {
        let mut guard = ReleaseGuard(self);
        let record = guard.0.build(presence)?;
        Ok(f(record.as_raw()))
    }

    /// Release the buffers of the most recent build.
    pub fn release(&mut self) {
        self.buffers.release_all();
    }

    /// The buffers backing the most recent build.
    #[must_use]
    pub const fn buffers(&self) -> &BufferSet {
        &self.buffers
    }

    fn marshal(&mut self, p: &Presence) -> Result<DiscordRichPresence> {
        let b = &mut self.buffers;
        Ok(DiscordRichPresence {
            state: b.allocate(p.state.as_deref())?,
            details: b.allocate(p.details.as_deref())?,
            startTimestamp: p.start_timestamp,
            endTimestamp: p.end_timestamp,
            largeImageKey: b.allocate(p.large_image_key.as_deref())?,
            largeImageText: b.allocate(p.large_image_text.as_deref())?,
            smallImageKey: b.allocate(p.small_image_key.as_deref())?,
            smallImageText: b.allocate(p.small_image_text.as_deref())?,
            partyId: b.allocate(p.party_id.as_deref())?,
            partySize: saturating_int(p.party_size),
            partyMax: saturating_int(p.party_max),
            partyPrivacy: p.party_privacy.to_ffi(),
            matchSecret: b.allocate(p.match_secret.as_deref())?,
            joinSecret: b.allocate(p.join_secret.as_deref())?,
            spectateSecret: b.allocate(p.spectate_secret.as_deref())?,
            instance: i8::from(p.instance),
        })
    }
}

/// Releases the builder's buffers when dropped.
struct ReleaseGuard<'a>(&'a mut RecordBuilder);

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}

fn saturating_int(v: u32) -> c_int {
    c_int::try_from(v).unwrap_or(c_int::MAX)
}
