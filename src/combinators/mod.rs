// ストリームコンビネータ - 有界キュー上の汎用オペレータ
// 各オペレータはtokioタスクを1つ以上起動し、新しいキューまたは終端値を返す
//
// 下流がキューを閉じた場合、オペレータは自分の入力キューも閉じて上流へ停止を伝える

pub mod fan;
pub mod source;
pub mod transform;
pub mod window;

/// 中間ステージの出力キュー容量
pub const STAGE_CAPACITY: usize = 16;

pub use fan::{merge, merge_with_capacity, split};
pub use source::line_source;
pub use transform::{filter, map, reduce};
pub use window::{tail_window, take};
