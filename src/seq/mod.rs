//! 序列（行）与位点（列）两种状态列表，以及它们共享的只读接口。

pub mod sequence;
pub mod site;
pub mod tools;

pub use sequence::Sequence;
pub use site::Site;

use crate::util::alphabet::Alphabet;

/// 带字母表的状态编码列表：`Sequence` 是水平方向，`Site` 是垂直方向
pub trait SymbolList {
    fn alphabet(&self) -> Alphabet;

    fn states(&self) -> &[i32];

    fn len(&self) -> usize {
        self.states().len()
    }

    fn is_empty(&self) -> bool {
        self.states().is_empty()
    }
}
