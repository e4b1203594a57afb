// ==========================================
// 学校排课管理系统 - 导入文件解析器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)，按扩展名自动选择
// 两种表格:
//   课时矩阵 - 首列为班级名，首行为科目名，单元格为周课时数
//   任课名册 - 表头列 教师/科目/班级/教室（可选 周课时）
// ==========================================

use crate::domain::import::{HoursMatrix, LoadRosterRow};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// 名册表头契约（与上游导出模板约定）
const ROSTER_TEACHER: &str = "教师";
const ROSTER_SUBJECT: &str = "科目";
const ROSTER_CLASS: &str = "班级";
const ROSTER_ROOM: &str = "教室";
const ROSTER_HOURS: &str = "周课时";

// ==========================================
// 课时矩阵解析
// ==========================================
/// 解析课时矩阵文件
///
/// 首行为科目名（首格为角格，忽略），后续每行首列为班级名。
/// 空白或 0 的单元格视为"不开课"; 非整数单元格报类型转换错误。
pub fn parse_hours_matrix(path: &Path) -> ImportResult<HoursMatrix> {
    let grid = read_grid(path)?;
    let mut rows = grid.into_iter();

    let header = rows
        .next()
        .ok_or_else(|| ImportError::EmptySheet(path.display().to_string()))?;
    // 首格是角格（班级列标题），其后才是科目名
    let subject_names: Vec<String> = header
        .into_iter()
        .skip(1)
        .filter(|name| !name.is_empty())
        .collect();

    let mut matrix = HoursMatrix::new(Vec::new(), subject_names.clone());
    for (row_offset, row) in rows.enumerate() {
        let row_index = row_offset + 1;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let class_name = match row.first() {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                return Err(ImportError::FieldMappingError {
                    row: row_index,
                    message: "班级名为空".to_string(),
                })
            }
        };
        matrix.class_names.push(class_name.clone());

        for (col_index, subject_name) in subject_names.iter().enumerate() {
            let cell = row.get(col_index + 1).map(String::as_str).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            let hours: i32 =
                cell.parse()
                    .map_err(|_| ImportError::TypeConversionError {
                        row: row_index,
                        field: subject_name.clone(),
                        message: format!("期望非负整数，实际 '{}'", cell),
                    })?;
            matrix.set_hours(&class_name, subject_name, hours);
        }
    }

    Ok(matrix)
}

// ==========================================
// 任课名册解析
// ==========================================
/// 解析任课名册文件
///
/// 行序即源文件顺序——分组编号的分配依据，解析阶段不得重排。
pub fn parse_load_roster(path: &Path) -> ImportResult<Vec<LoadRosterRow>> {
    let grid = read_grid(path)?;
    let mut rows = grid.into_iter();

    let header = rows
        .next()
        .ok_or_else(|| ImportError::EmptySheet(path.display().to_string()))?;
    let teacher_col = require_column(&header, ROSTER_TEACHER)?;
    let subject_col = require_column(&header, ROSTER_SUBJECT)?;
    let class_col = require_column(&header, ROSTER_CLASS)?;
    let room_col = require_column(&header, ROSTER_ROOM)?;
    let hours_col = header.iter().position(|h| h == ROSTER_HOURS);

    let mut roster = Vec::new();
    for (row_offset, row) in rows.enumerate() {
        let row_index = row_offset + 1;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let teacher_name = required_cell(&row, teacher_col, ROSTER_TEACHER, row_index)?;
        let subject_name = required_cell(&row, subject_col, ROSTER_SUBJECT, row_index)?;
        let class_name = required_cell(&row, class_col, ROSTER_CLASS, row_index)?;
        let room_name = required_cell(&row, room_col, ROSTER_ROOM, row_index)?;

        let weekly_hours = match hours_col {
            Some(col) => {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.parse::<i32>().map_err(|_| {
                        ImportError::TypeConversionError {
                            row: row_index,
                            field: ROSTER_HOURS.to_string(),
                            message: format!("期望整数，实际 '{}'", cell),
                        }
                    })?)
                }
            }
            None => None,
        };

        roster.push(LoadRosterRow {
            teacher_name,
            subject_name,
            class_name,
            room_name,
            weekly_hours,
        });
    }

    Ok(roster)
}

fn require_column(header: &[String], name: &str) -> ImportResult<usize> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ImportError::MissingColumn {
            column: name.to_string(),
        })
}

fn required_cell(
    row: &[String],
    col: usize,
    field: &str,
    row_index: usize,
) -> ImportResult<String> {
    match row.get(col) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ImportError::FieldMappingError {
            row: row_index,
            message: format!("{} 为空", field),
        }),
    }
}

// ==========================================
// 原始表格读取（按扩展名自动选择）
// ==========================================
/// 把文件读成字符串表格，单元格已去除首尾空白
fn read_grid(path: &Path) -> ImportResult<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => read_csv_grid(path),
        "xlsx" | "xls" => read_excel_grid(path),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}

fn read_csv_grid(path: &Path) -> ImportResult<Vec<Vec<String>>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result?;
        grid.push(
            record
                .iter()
                .map(|cell| cell.trim().to_string())
                .collect::<Vec<String>>(),
        );
    }
    Ok(grid)
}

fn read_excel_grid(path: &Path) -> ImportResult<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

    let mut grid = Vec::new();
    for row in range.rows() {
        grid.push(
            row.iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect::<Vec<String>>(),
        );
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_parse_hours_matrix() {
        let file = write_csv("班级,数学,语文\n5A,4,3\n6B,,2\n");
        let matrix = parse_hours_matrix(file.path()).unwrap();

        assert_eq!(matrix.class_names, vec!["5A", "6B"]);
        assert_eq!(matrix.subject_names, vec!["数学", "语文"]);
        assert_eq!(matrix.hours_for("5A", "数学"), Some(4));
        // 空白单元格视为不开课
        assert_eq!(matrix.hours_for("6B", "数学"), None);
        assert_eq!(matrix.hours_for("6B", "语文"), Some(2));
    }

    #[test]
    fn test_parse_hours_matrix_rejects_non_integer_cell() {
        let file = write_csv("班级,数学\n5A,很多\n");
        let err = parse_hours_matrix(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { .. }));
    }

    #[test]
    fn test_parse_load_roster_preserves_row_order() {
        let file = write_csv("教师,科目,班级,教室\n张老师,数学,5A,101\n李老师,数学,5A,102\n");
        let roster = parse_load_roster(file.path()).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].teacher_name, "张老师");
        assert_eq!(roster[1].teacher_name, "李老师");
        assert!(roster[0].weekly_hours.is_none());
    }

    #[test]
    fn test_parse_load_roster_optional_hours_column() {
        let file = write_csv("教师,科目,班级,教室,周课时\n张老师,数学,5A,101,4\n李老师,语文,5A,102,\n");
        let roster = parse_load_roster(file.path()).unwrap();

        assert_eq!(roster[0].weekly_hours, Some(4));
        assert_eq!(roster[1].weekly_hours, None);
    }

    #[test]
    fn test_parse_load_roster_missing_column() {
        let file = write_csv("教师,科目,班级\n张老师,数学,5A\n");
        let err = parse_load_roster(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingColumn { column } if column == "教室"
        ));
    }

    #[test]
    fn test_parse_load_roster_skips_blank_rows() {
        let file = write_csv("教师,科目,班级,教室\n张老师,数学,5A,101\n,,,\n李老师,语文,5A,102\n");
        let roster = parse_load_roster(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "教师,科目,班级,教室").unwrap();
        let err = parse_load_roster(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_file_not_found() {
        let err = parse_hours_matrix(Path::new("non_existent.csv")).unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
