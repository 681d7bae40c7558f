// ==========================================
// 库存二维码系统 - 分隔文本分词器
// ==========================================
// 职责: 单行逗号分隔文本 → 字段列表
// 规则: 双态状态机（引号外 / 引号内）
//   - 引号外遇 `"` → 进入引号内（引号本身不输出）
//   - 引号内遇 `""` → 输出一个 `"`,仍在引号内
//   - 引号内遇单个 `"` → 退出引号
//   - 引号外遇 `,` → 结束当前字段（去首尾空白）
//   - 行尾 → 输出最后一个字段
// ==========================================

use crate::importer::stock_importer_trait::LineTokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

pub struct DelimitedTextTokenizer;

impl LineTokenizer for DelimitedTextTokenizer {
    fn tokenize_line(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut state = State::Unquoted;
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            match (state, ch) {
                (State::Unquoted, '"') => state = State::Quoted,
                (State::Unquoted, ',') => {
                    fields.push(current.trim().to_string());
                    current.clear();
                }
                (State::Quoted, '"') => {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        state = State::Unquoted;
                    }
                }
                (_, c) => current.push(c),
            }
        }

        fields.push(current.trim().to_string());
        fields
    }
}
