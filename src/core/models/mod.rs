//! Data models for `OpportunityFinder`

pub mod category;
pub mod engagement;
pub mod opportunity;
pub mod profile;

pub use category::Category;
pub use engagement::{engagement_for, Engagement, EngagementMap};
pub use opportunity::{CostRange, Eligibility, HoursRange, Opportunity};
pub use profile::{Transportation, UserProfile};
