/// Router Module Index
///
/// Organizes the navigable views into guard-segregated modules. Each module applies its
/// guard as a route layer over the whole group, so a view can never be registered
/// without the access rule of the group it sits in.
///
/// The four modules map directly to the guard variants.

/// Views open to every visitor, plus the session endpoints.
pub mod public;

/// Views for any signed-in user, and the guest/customer-only views.
pub mod authenticated;

/// Views restricted to hostel owners.
pub mod owner;

/// Views restricted to administrators.
pub mod admin;
