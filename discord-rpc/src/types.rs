#![allow(unsafe_code)]
//! Plain value types shared across the API: enumerations and the Discord user.

use std::ffi::c_int;

use crate::ffi::read_borrowed;

macro_rules! ffi_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident {
        $($(#[$vm:meta])* $variant:ident = $val:expr),* $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name { $($(#[$vm])* $variant = $val),* }

        impl $name {
            /// Convert from FFI `int`. Returns `None` for unknown values.
            #[must_use]
            pub const fn from_ffi(v: c_int) -> Option<Self> {
                match v { $($val => Some(Self::$variant),)* _ => None }
            }

            /// The integer the native library expects.
            #[must_use]
            pub const fn to_ffi(self) -> c_int {
                self as c_int
            }
        }
    };
}

ffi_enum! {
    /// Who may join a party advertised in the presence.
    #[derive(Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum PartyPrivacy {
        /// Only invited users.
        #[default]
        Private = 0,
        /// Anyone.
        Public = 1,
    }
}

ffi_enum! {
    /// Answer to a join request.
    pub enum Reply {
        /// Decline.
        No = 0,
        /// Accept.
        Yes = 1,
        /// Dismiss without answering.
        Ignore = 2,
    }
}

/// A Discord user, as reported by the ready and join-request events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    /// Snowflake user ID.
    pub user_id: String,
    /// Account name.
    pub username: String,
    /// Legacy four-digit discriminator (`"0"` for migrated accounts).
    pub discriminator: String,
    /// Avatar hash. Empty when the user has the default avatar.
    pub avatar: String,
}

impl User {
    /// Copy a native user record into an owned value.
    ///
    /// # Safety
    ///
    /// Every string field of `raw` must be null or a valid NUL-terminated string.
    pub(crate) unsafe fn from_raw(raw: &discord_rpc_sys::DiscordUser) -> Self {
        unsafe {
            Self {
                user_id: read_borrowed(raw.userId).into_owned(),
                username: read_borrowed(raw.username).into_owned(),
                discriminator: read_borrowed(raw.discriminator).into_owned(),
                avatar: read_borrowed(raw.avatar).into_owned(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;

    #[test]
    fn enum_integers_match_header() {
        assert_eq!(Reply::No.to_ffi(), discord_rpc_sys::DISCORD_REPLY_NO as c_int);
        assert_eq!(Reply::Yes.to_ffi(), discord_rpc_sys::DISCORD_REPLY_YES as c_int);
        assert_eq!(
            Reply::Ignore.to_ffi(),
            discord_rpc_sys::DISCORD_REPLY_IGNORE as c_int
        );
        assert_eq!(
            PartyPrivacy::Public.to_ffi(),
            discord_rpc_sys::DISCORD_PARTY_PUBLIC as c_int
        );
        assert_eq!(PartyPrivacy::default(), PartyPrivacy::Private);
    }

    #[test]
    fn from_ffi_rejects_unknown() {
        assert_eq!(Reply::from_ffi(1), Some(Reply::Yes));
        assert_eq!(Reply::from_ffi(3), None);
        assert_eq!(PartyPrivacy::from_ffi(-1), None);
    }

    #[test]
    fn user_from_raw_tolerates_nulls() {
        let raw = discord_rpc_sys::DiscordUser {
            userId: c"53908232506183680".as_ptr(),
            username: c"Mason".as_ptr(),
            discriminator: ptr::null(),
            avatar: ptr::null(),
        };
        let user = unsafe { User::from_raw(&raw) };
        assert_eq!(user.user_id, "53908232506183680");
        assert_eq!(user.username, "Mason");
        assert!(user.discriminator.is_empty() && user.avatar.is_empty());
    }
}
