pub mod gallery;
pub mod image_card;
pub mod image_details;
pub mod tagged_images;
pub mod tags_list;
pub mod upload_page;
