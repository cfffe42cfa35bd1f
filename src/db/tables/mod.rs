//! Database table operations

mod song_table;
mod song_tag_table;
mod tag_table;
mod user_table;

pub use song_table::SongTable;
pub use song_tag_table::SongTagTable;
pub use tag_table::TagTable;
pub use user_table::UserTable;
