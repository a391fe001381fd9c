//! View-model construction.
//!
//! - [`builder`] - folds flat records into sections, sub-sections and collections
//! - [`ownership`] - decides where a collection belongs
//! - [`order`] - position ordering and the featured slot
//! - [`model`] - the resulting tree and the home screen derived from it

mod builder;
mod model;
mod order;
mod ownership;

pub use builder::{
    build, build_from_collections, build_from_content_items, build_from_sections,
    build_from_sub_sections, BuildOutput, ContentSource, ViewModelBuilder,
};
pub use model::{
    CollectionLocation, CollectionNode, FeaturedEntry, HomeScreen, ItemKey, PreviewItem,
    SectionNode, SubSectionNode, ViewModel,
};
pub use order::{position_key, sort_by_position, Positioned, FEATURED_POSITION};
pub use ownership::{normalize, BuildWarning, Ownership, OwnershipKey};
