//! 答案文本的规范化
//!
//! 补全服务和页面反馈给出的答案格式不完全一致，进入标记流程前统一处理。

use regex::Regex;

/// 去掉补全答案里偶尔出现的 `CORRECT_ANSWER:` 前缀
pub fn strip_answer_prefix(answer: &str) -> String {
    match Regex::new(r"^\s*CORRECT_ANSWER:\s*") {
        Ok(re) => re.replace(answer, "").trim().to_string(),
        Err(_) => answer.trim().to_string(),
    }
}

/// 去掉排序答案前的序号（如 `"1. "`）
pub fn strip_ordinal(answer: &str) -> String {
    match Regex::new(r"^\d+\.\s") {
        Ok(re) => re.replace(answer, "").trim().to_string(),
        Err(_) => answer.trim().to_string(),
    }
}

/// 拆分匹配题答案 `"术语 - 描述"`
///
/// 只在第一个 ` - ` 处拆分，描述本身可以包含连字符：
/// `"A - B - C"` 得到 `("A", "B - C")`。
pub fn split_matching_answer(answer: &str) -> Option<(String, String)> {
    let re = Regex::new(r"\s+-\s+").ok()?;
    let mut parts = re.splitn(answer, 2);
    let term = parts.next()?.trim();
    let description = parts.next()?.trim();
    if term.is_empty() {
        return None;
    }
    Some((term.to_string(), description.to_string()))
}

/// 解析已作答题目反馈中的正确答案
///
/// 反馈形如 `"The correct answer is: Paris"`，冒号之前的说明文字丢弃。
/// 匹配题的反馈形如 `"A → x, B → y"`，转换为补全答案相同的 `"A - x"` 形式。
pub fn parse_right_answer(feedback: &str) -> Vec<String> {
    let answer_text = match Regex::new(r"(?s)^.*:\s*") {
        Ok(re) => re.replace(feedback, "").trim().to_string(),
        Err(_) => feedback.trim().to_string(),
    };
    if answer_text.is_empty() {
        return Vec::new();
    }

    if answer_text.contains('→') {
        answer_text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('→') {
                Some((term, description)) => {
                    format!("{} - {}", term.trim(), description.trim())
                }
                None => part.to_string(),
            })
            .collect()
    } else {
        vec![answer_text]
    }
}
