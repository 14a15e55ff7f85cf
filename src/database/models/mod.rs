pub mod availability;
pub mod collab;
pub mod contact;
pub mod fields;
pub mod gig;
pub mod notification;
pub mod page;
pub mod profile;
pub mod slate;
pub mod user;

pub use availability::{Availability, AvailabilityPatch, AvailabilityStatus, AvailabilityWindow, NewAvailability};
pub use collab::{
    CollabFilter, CollabPatch, CollabPost, CollabPostDetail, CollabStatus, Collaborator, JoinCollab, NewCollabPost,
};
pub use contact::{ContactPatch, CrewContact, NewContact};
pub use gig::{Gig, GigFilter, GigPatch, GigStatus, NewGig};
pub use notification::{NewNotification, Notification, NotificationQuery};
pub use page::{ListParams, Page, Paged};
pub use profile::{Profile, ProfileInput, PublicProfile, RoleInput, RolesInput, UserRole};
pub use slate::{NewSlatePost, SlateLike, SlatePost, SlateQuery};
pub use user::User;
