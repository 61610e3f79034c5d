#![allow(dead_code, unused_imports)]

pub(crate) mod fake_hdfs;
pub(crate) mod test_context;

pub(crate) use fake_hdfs::FakeHdfs;
pub(crate) use test_context::{NOW, OLD, TestContext, YOUNG};
