// ==========================================
// 内控管理分析系统 - 测试数据生成器
// ==========================================
// 用途: 生成四个数据源的样例 CSV, 供手工运行流水线
// 用法: cargo run --bin generate_test_data [输出目录]
// ==========================================

use std::fs;
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test_data"));
    fs::create_dir_all(&out_dir)?;

    // 人员明细: 表头前有一行导出说明
    fs::write(
        out_dir.join("人员明细信息.csv"),
        "人员明细信息导出,,,\n\
         u_uid,员工编号,员工姓名,身份证号\n\
         u001,E01,张三,110101199001011234\n\
         u002,E02,李四,110101199002025678\n\
         u003,E03,王五,110101199003039999\n",
    )?;

    // 资源员工: 表头即首行
    fs::write(
        out_dir.join("资源员工信息.csv"),
        "*资源姓名,Uniportal账号,*ID编码\n\
         张三,w0001,110101199001011234\n\
         李四,w0002,110101199002025678\n",
    )?;

    // 车辆出勤记录: 表头前有一行导出说明
    fs::write(
        out_dir.join("车辆出勤记录信息.csv"),
        "车辆出勤记录导出,,,,,,,,,,,\n\
         日期,上传人id,上传人姓名,开始时间,结束时间,车牌号码,驾驶员名称,行驶里程,路桥费,加班费,省,市\n\
         2026-01-10,u001,张三,2026-01-10 08:30:00,2026-01-10 17:30:00,京A12345,张三,120,30,0,北京,北京市\n\
         2026-01-10,u002,李四,2026-01-10 09:30:00,2026-01-10 18:00:00,京B23456,李四,400,-5,10,北京,北京市\n\
         2026-01-11,u001,张三,,2026-01-11 10:00:00,京A12345,张三,80,20,0,北京,北京市\n\
         2026-01-11,u002,李四,2026-01-11 08:00:00,2026-01-12 02:00:00,京B23456,李四,260,55,15,广东,深圳市\n",
    )?;

    // 工单履行明细: 表头即首行
    fs::write(
        out_dir.join("工单履行明细.csv"),
        "工单类别,责任人账号,责任人姓名,工单日期,任务状态\n\
         前台工单,w0001,张三,2026-01-10,已完成\n\
         前台工单,w0001,张三,2026-01-10,审核通过\n\
         前台工单,w0001,张三,2026-01-10,执行中\n\
         前台工单,w0002,李四,2026-01-10,分析中\n\
         前台工单,w0002,李四,2026-01-11,已指派\n\
         后台工单,w0001,张三,2026-01-10,已完成\n",
    )?;

    println!("样例数据已生成到: {}", out_dir.display());
    println!(
        "运行: cargo run --bin vehicle-audit -- \
         {0}/人员明细信息.csv {0}/资源员工信息.csv {0}/车辆出勤记录信息.csv {0}/工单履行明细.csv",
        out_dir.display()
    );
    Ok(())
}
