/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *
 * 置かないもの
 *  - decode ロジック / extractor 実装
 */
use super::core::PublicId;

// notes
pub enum NoteTag {}
pub type PublicNoteId = PublicId<NoteTag>;
