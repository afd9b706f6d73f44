mod u64_ext;
pub use u64_ext::U64Ext;
