// 出力機能
// 出力先のオープンと、マージ済み結果の逐次書き込み

pub mod sink;
pub mod writer;

// 公開API
pub use sink::{open_sink, SinkWriter};
pub use writer::spawn_writer;
